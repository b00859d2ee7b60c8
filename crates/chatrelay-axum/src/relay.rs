//! Streaming response relay.
//!
//! Forwards the provider's byte stream to the client unchanged and, once
//! the upstream completes cleanly, appends exactly one JSON metadata line
//! before closing. Pull-based: one upstream read per downstream poll, so a
//! slow client throttles the upstream. Dropping the relay (client
//! disconnect) drops the upstream stream, releasing the provider
//! connection; no metadata is ever emitted on cancellation or error.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use serde::Serialize;

use chatrelay_core::ports::inference::ByteStream;
use chatrelay_core::registry::ResolvedParams;

/// Per-call bookkeeping appended after the model output.
///
/// Not part of the upstream protocol; the client could not infer any of
/// this from raw tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMetadata {
    /// Registry key the client asked for.
    pub model_key: String,
    /// Provider routing id actually called.
    pub model_id: String,
    /// The clamped parameter bundle that was dispatched.
    pub params: ResolvedParams,
}

impl StreamMetadata {
    /// The trailing line: `{"meta":{...}}\n`.
    fn to_line(&self) -> Bytes {
        let mut line = serde_json::json!({ "meta": self }).to_string();
        line.push('\n');
        Bytes::from(line)
    }
}

/// Relay stream: upstream bytes verbatim, then one metadata line.
pub struct MetaTrailer {
    /// Dropped as soon as the upstream finishes or errors.
    upstream: Option<ByteStream>,
    /// Taken exactly once, on clean upstream completion.
    metadata: Option<StreamMetadata>,
}

impl MetaTrailer {
    #[must_use]
    pub fn new(upstream: ByteStream, metadata: StreamMetadata) -> Self {
        Self {
            upstream: Some(upstream),
            metadata: Some(metadata),
        }
    }
}

impl Stream for MetaTrailer {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        let Some(upstream) = this.upstream.as_mut() else {
            return Poll::Ready(None);
        };

        match upstream.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk))),
            Poll::Ready(Some(Err(e))) => {
                // Error path: terminate without the metadata line.
                this.upstream = None;
                this.metadata = None;
                Poll::Ready(Some(Err(io::Error::other(e.to_string()))))
            }
            Poll::Ready(None) => {
                this.upstream = None;
                match this.metadata.take() {
                    Some(metadata) => Poll::Ready(Some(Ok(metadata.to_line()))),
                    None => Poll::Ready(None),
                }
            }
        }
    }
}
