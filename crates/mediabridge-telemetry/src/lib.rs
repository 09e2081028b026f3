#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Logging primitives shared across the MediaBridge workspace.
//!
//! Layout:
//! - `init.rs`: subscriber installation and format selection
//! - `context.rs`: per-invocation span carrying the request identifier
//! - `error.rs`: telemetry error types

pub mod context;
pub mod error;
pub mod init;

pub use context::invocation_span;
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
