//! Hosted inference provider client for chatrelay.

#![deny(unused_crate_dependencies)]

// Runtime reqwest executes on.
use tokio as _;

pub mod client;
pub mod config;

pub use client::WorkersAiClient;
pub use config::ProviderConfig;
