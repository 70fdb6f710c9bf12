//! Remote server client module
//!
//! Provides an HTTP client for querying another kbh server.

mod client;
mod types;

pub use client::RemoteClient;
pub use types::*;
