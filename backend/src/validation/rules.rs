//! Built-in validation rules.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ValidationVerdict, Validator, UNKNOWN_COLUMN_DIAGNOSTIC};
use crate::error::IngestResult;
use crate::parsing::TabularReader;
use crate::storage::ScratchFile;

/// Fails any upload whose display name contains a marker substring.
#[derive(Debug, Clone)]
pub struct ForbiddenMarker {
    marker: String,
}

impl ForbiddenMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

#[async_trait]
impl Validator for ForbiddenMarker {
    fn name(&self) -> &str {
        "forbidden_marker"
    }

    async fn validate(&self, file: &ScratchFile) -> IngestResult<ValidationVerdict> {
        // An empty marker would match every name.
        if !self.marker.is_empty() && file.display_name().contains(&self.marker) {
            return Ok(ValidationVerdict::fail(
                UNKNOWN_COLUMN_DIAGNOSTIC,
                "FORBIDDEN_MARKER",
            ));
        }
        Ok(ValidationVerdict::pass())
    }
}

/// Parses the upload and fails when a required header column is missing.
pub struct RequiredColumns {
    columns: Vec<String>,
    reader: Arc<TabularReader>,
}

impl RequiredColumns {
    pub fn new(columns: Vec<String>, reader: Arc<TabularReader>) -> Self {
        Self { columns, reader }
    }
}

#[async_trait]
impl Validator for RequiredColumns {
    fn name(&self) -> &str {
        "required_columns"
    }

    async fn validate(&self, file: &ScratchFile) -> IngestResult<ValidationVerdict> {
        let table = self.reader.read(file).await?;
        match self.columns.iter().find(|c| !table.has_column(c)) {
            Some(missing) => Ok(ValidationVerdict::fail(
                format!("missing required column {:?}", missing),
                "MISSING_COLUMN",
            )),
            None => Ok(ValidationVerdict::pass()),
        }
    }
}

/// Runs rules in order and stops at the first failure.
#[derive(Default)]
pub struct AllOf {
    rules: Vec<Arc<dyn Validator>>,
}

impl AllOf {
    pub fn new(rules: Vec<Arc<dyn Validator>>) -> Self {
        Self { rules }
    }

    pub fn with(mut self, rule: Arc<dyn Validator>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[async_trait]
impl Validator for AllOf {
    fn name(&self) -> &str {
        "all_of"
    }

    async fn validate(&self, file: &ScratchFile) -> IngestResult<ValidationVerdict> {
        for rule in &self.rules {
            let verdict = rule.validate(file).await?;
            if !verdict.is_pass() {
                tracing::debug!(rule = rule.name(), code = ?verdict.code, "validation rule failed");
                return Ok(verdict);
            }
        }
        Ok(ValidationVerdict::pass())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::logging::MemoryLog;
    use crate::storage::ScratchStore;

    fn reader() -> Arc<TabularReader> {
        Arc::new(TabularReader::new(".txt", Arc::new(MemoryLog::new())))
    }

    #[tokio::test]
    async fn test_forbidden_marker_pass_and_fail() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScratchStore::new(dir.path());
        let rule = ForbiddenMarker::new("invalid");

        let ok = store.store(b"MA\tElement\n1\tV\n", "run.txt").await.unwrap();
        assert!(rule.validate(&ok).await.unwrap().is_pass());

        let bad = store.store(b"MA\tElement\n1\tV\n", "invalid_run.txt").await.unwrap();
        let verdict = rule.validate(&bad).await.unwrap();
        assert!(!verdict.is_pass());
        assert_eq!(verdict.message.as_deref(), Some(UNKNOWN_COLUMN_DIAGNOSTIC));
        assert_eq!(verdict.code.as_deref(), Some("FORBIDDEN_MARKER"));

        // Read-only: the file is still there and intact
        assert_eq!(bad.read_bytes().await.unwrap(), b"MA\tElement\n1\tV\n");
    }

    #[tokio::test]
    async fn test_forbidden_marker_ignores_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("invalid");
        std::fs::create_dir(&scratch).unwrap();
        let file = ScratchStore::new(&scratch).store(b"x", "run.txt").await.unwrap();

        let verdict = ForbiddenMarker::new("invalid").validate(&file).await.unwrap();
        assert!(verdict.is_pass());
    }

    #[tokio::test]
    async fn test_empty_marker_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path()).store(b"x", "any.txt").await.unwrap();
        assert!(ForbiddenMarker::new("").validate(&file).await.unwrap().is_pass());
    }

    #[tokio::test]
    async fn test_required_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScratchStore::new(dir.path());
        let rule = RequiredColumns::new(vec!["MA".to_string(), "Element".to_string()], reader());

        let ok = store.store(b"MA\tElement\n1\tV\n", "a.txt").await.unwrap();
        assert!(rule.validate(&ok).await.unwrap().is_pass());

        let missing = store.store(b"MA\tWeight\n1\t2\n", "b.txt").await.unwrap();
        let verdict = rule.validate(&missing).await.unwrap();
        assert_eq!(verdict.code.as_deref(), Some("MISSING_COLUMN"));
        assert!(verdict.message.unwrap().contains("Element"));
    }

    #[tokio::test]
    async fn test_required_columns_propagates_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path()).store(b"MA\n1\n", "a.csv").await.unwrap();
        let rule = RequiredColumns::new(vec!["MA".to_string()], reader());

        let err = rule.validate(&file).await.unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_all_of_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path())
            .store(b"Weight\n1\n", "invalid.txt")
            .await
            .unwrap();

        let chain = AllOf::default()
            .with(Arc::new(ForbiddenMarker::new("invalid")))
            .with(Arc::new(RequiredColumns::new(vec!["MA".to_string()], reader())));
        assert_eq!(chain.len(), 2);

        let verdict = chain.validate(&file).await.unwrap();
        assert_eq!(verdict.code.as_deref(), Some("FORBIDDEN_MARKER"));
    }

    #[tokio::test]
    async fn test_empty_chain_passes() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchStore::new(dir.path()).store(b"", "a.txt").await.unwrap();
        let chain = AllOf::new(Vec::new());
        assert!(chain.is_empty());
        assert!(chain.validate(&file).await.unwrap().is_pass());
    }
}
