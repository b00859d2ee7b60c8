//! Shared test fixtures: a stub inference client and router construction
//! over an in-memory database.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;

use chatrelay_axum::bootstrap::{AppContext, CorsConfig};
use chatrelay_axum::routes::create_router;
use chatrelay_core::ports::inference::{ByteStream, InferenceClient, InferenceError};
use chatrelay_core::registry::{DispatchBody, ModelRegistry};
use chatrelay_db::{SqliteKvStore, memory_pool};

/// What the stub provider does when called.
pub enum StubBehavior {
    /// Stream these chunks, then end cleanly.
    Chunks(Vec<&'static str>),
    /// Fail the call before any bytes flow.
    FailCall,
    /// Stream these chunks, then error mid-stream.
    FailAfter(Vec<&'static str>),
}

/// In-process stand-in for the hosted provider. Records every dispatch.
pub struct StubInference {
    behavior: StubBehavior,
    pub calls: AtomicUsize,
    pub last_model_id: Mutex<Option<String>>,
    pub last_body: Mutex<Option<serde_json::Value>>,
}

impl StubInference {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_model_id: Mutex::new(None),
            last_body: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for StubInference {
    async fn stream_chat(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<ByteStream, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_model_id.lock().unwrap() = Some(model_id.to_string());
        *self.last_body.lock().unwrap() = serde_json::to_value(body).ok();

        match &self.behavior {
            StubBehavior::Chunks(chunks) => {
                let items: Vec<Result<Bytes, InferenceError>> = chunks
                    .iter()
                    .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                    .collect();
                Ok(Box::pin(futures_util::stream::iter(items)))
            }
            StubBehavior::FailCall => Err(InferenceError::Status {
                status: 503,
                detail: "provider offline".to_string(),
            }),
            StubBehavior::FailAfter(chunks) => {
                let mut items: Vec<Result<Bytes, InferenceError>> = chunks
                    .iter()
                    .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                    .collect();
                items.push(Err(InferenceError::Stream("connection reset".to_string())));
                Ok(Box::pin(futures_util::stream::iter(items)))
            }
        }
    }

    async fn run_chat(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<serde_json::Value, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_model_id.lock().unwrap() = Some(model_id.to_string());
        *self.last_body.lock().unwrap() = serde_json::to_value(body).ok();
        Ok(serde_json::json!({ "response": "buffered" }))
    }
}

/// Build a router over an in-memory database and the given stub.
pub async fn test_app(inference: Arc<StubInference>) -> Router {
    let pool = memory_pool().await.expect("in-memory pool");
    let kv = Arc::new(SqliteKvStore::new(pool));
    let ctx = AppContext::new(ModelRegistry::builtin(), kv, inference);
    create_router(ctx, &CorsConfig::AllowAll)
}
