//! Network layer for endpoint-smoke
//!
//! Provides a bounded-time HTTP GET client.

mod client;

pub use client::{build_uri, HttpClient, HttpResponse};

/// Idle connections kept per host between checks
pub const POOL_MAX_IDLE_PER_HOST: usize = 2;

/// Idle connection lifetime
pub const POOL_IDLE_TIMEOUT_MS: u64 = 30_000;
