//! HTTP server module for the EDX ingest service.
//!
//! Thin axum wiring around [`IngestPipeline`](crate::pipeline::IngestPipeline).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Raw octet-stream bodies, upload name extraction        │
//! │  - Body size limit and body read timeout                  │
//! │  - JSON serialization, error mapping                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Pipeline (pipeline.rs)                                   │
//! │  - Scratch file lifecycle                                 │
//! │  - Validation rules and tabular parsing                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
