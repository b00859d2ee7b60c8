//! `SQLite`-backed persistence for chatrelay.

#![deny(unused_crate_dependencies)]

// Bundled sqlite; linked, not referenced directly.
use libsqlite3_sys as _;
// Runtime for sqlx and the #[tokio::test] harness.
use tokio as _;

pub mod kv;
pub mod setup;

pub use kv::SqliteKvStore;
pub use setup::{memory_pool, setup_database};
