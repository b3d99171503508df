//! Upload validation.
//!
//! A [`Validator`] inspects a scratch file without consuming it and returns a
//! [`ValidationVerdict`]. Returning `Err` means the rule itself could not run
//! (for example the file could not be parsed); the pipeline treats that the
//! same way as a failing verdict.

pub mod rules;

pub use rules::{AllOf, ForbiddenMarker, RequiredColumns};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IngestResult;
use crate::storage::ScratchFile;

/// Diagnostic returned to clients for every failed validation.
pub const UNKNOWN_COLUMN_DIAGNOSTIC: &str = "System.Exception column 0: MA (unknown column name)";

/// Outcome of a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub passed: bool,
    pub message: Option<String>,
    /// Machine-readable reason, e.g. `FORBIDDEN_MARKER`
    pub code: Option<String>,
}

impl ValidationVerdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
            code: None,
        }
    }

    pub fn fail(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            code: Some(code.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.passed
    }
}

/// A read-only check over an uploaded file.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Short rule name used in logs.
    fn name(&self) -> &str;

    async fn validate(&self, file: &ScratchFile) -> IngestResult<ValidationVerdict>;
}
