//! endpoint-smoke - quick status/count checks for JSON REST endpoints
//!
//! Sends one GET per configured endpoint, summarizes the JSON body and
//! prints a short human-readable report.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::field_reassign_with_default,
    clippy::multiple_crate_versions
)]

pub mod check;
pub mod config;
pub mod error;
pub mod network;
pub mod runner;

pub use check::{CheckResult, EndpointCheck};
pub use config::Config;
pub use error::{Result, SmokeError};
pub use runner::{RunSummary, SmokeRunner};
