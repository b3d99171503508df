//! # EDX Ingest
//!
//! HTTP service that accepts uploaded tab-delimited EDX measurement files,
//! validates them, and returns fixed analysis-style payloads.
//!
//! ## Architecture
//!
//! - [`storage`]: Request-scoped scratch files with guaranteed removal
//! - [`parsing`]: Tab-delimited table reader
//! - [`validation`]: Pluggable validation rules and verdicts
//! - [`envelope`]: The three response shapes
//! - [`pipeline`]: Store → inspect → assemble → release
//! - [`logging`]: Daily failure log capability
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum router and handlers
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use edx_ingest::config::ServiceConfig;
//! use edx_ingest::logging::MemoryLog;
//! use edx_ingest::pipeline::IngestPipeline;
//!
//! # async fn run() {
//! let pipeline = IngestPipeline::from_config(&ServiceConfig::default(), Arc::new(MemoryLog::new()));
//! let result = pipeline.validate_upload(b"MA\tElement\n1\tV\n", "sample.txt").await;
//! assert_eq!(result.code, 0);
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod parsing;
pub mod pipeline;
pub mod storage;
pub mod validation;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ErrorContext, IngestError, IngestResult};
