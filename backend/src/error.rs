//! Error types for the ingestion pipeline.
//!
//! Every failure carries an [`ErrorContext`] naming the operation and the file
//! involved, so a log line is enough to reproduce the problem. The messages
//! shown to HTTP clients are fixed strings chosen by the HTTP layer; the text
//! of these errors only reaches the logs.

use std::fmt;
use std::path::Path;

/// Result type for pipeline operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Structured context for ingestion errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "store", "read_table")
    pub operation: Option<String>,
    /// Identity of the file involved (scratch path or display name)
    pub file: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the file identity.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the file identity from a path.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_file(path.display().to_string())
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref file) = self.file {
            parts.push(format!("file={}", file));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for the ingestion pipeline
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file name does not carry the tab-delimited suffix.
    #[error("Unsupported format: {name} is not a tab-delimited text file")]
    UnsupportedFormat { name: String },

    /// The file looked like tabular text but could not be parsed into a table.
    #[error("Malformed table: {message} {context}")]
    MalformedTable {
        message: String,
        context: ErrorContext,
    },

    /// A validation rule rejected the file.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: String,
        code: Option<String>,
    },

    /// Scratch storage could not be created, written, read or removed.
    #[error("I/O error: {message} {context}")]
    Io {
        message: String,
        context: ErrorContext,
    },
}

impl IngestError {
    /// Create an unsupported format error for the given file name.
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Create a malformed table error with context.
    pub fn malformed(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::MalformedTable {
            message: message.into(),
            context,
        }
    }

    /// Create a validation failure.
    pub fn validation(message: impl Into<String>, code: Option<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
            code,
        }
    }

    /// Create an I/O error from an underlying `std::io::Error`.
    pub fn io(err: &std::io::Error, context: ErrorContext) -> Self {
        Self::Io {
            message: err.to_string(),
            context,
        }
    }

    /// Get the error context, if this variant carries one.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::MalformedTable { context, .. } | Self::Io { context, .. } => Some(context),
            Self::UnsupportedFormat { .. } | Self::ValidationFailed { .. } => None,
        }
    }

    /// Short machine-readable kind, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::MalformedTable { .. } => "MALFORMED_TABLE",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::Io { .. } => "IO_FAILURE",
        }
    }
}
