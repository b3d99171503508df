//! Upload pipeline: store → inspect → assemble → release.
//!
//! Each call owns its scratch file for the duration of the call. The file is
//! released explicitly on the normal path and by [`ScratchFile`]'s `Drop` on
//! every other path (early `?` return, panic in a rule, cancelled future).
//!
//! [`ScratchFile`]: crate::storage::ScratchFile

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::envelope::ValidationResult;
use crate::error::{IngestError, IngestResult};
use crate::logging::FailureLog;
use crate::parsing::{TabularReader, TabularTable};
use crate::storage::ScratchStore;
use crate::validation::{AllOf, ForbiddenMarker, RequiredColumns, ValidationVerdict, Validator};

pub struct IngestPipeline {
    store: ScratchStore,
    reader: Arc<TabularReader>,
    validator: Arc<dyn Validator>,
    log: Arc<dyn FailureLog>,
}

impl IngestPipeline {
    pub fn new(
        store: ScratchStore,
        reader: Arc<TabularReader>,
        validator: Arc<dyn Validator>,
        log: Arc<dyn FailureLog>,
    ) -> Self {
        Self {
            store,
            reader,
            validator,
            log,
        }
    }

    /// Build the pipeline described by `config`, writing failures to `log`.
    ///
    /// The forbidden-marker rule always runs; the required-columns rule is
    /// added when `config.required_columns` is non-empty.
    pub fn from_config(config: &ServiceConfig, log: Arc<dyn FailureLog>) -> Self {
        let reader = Arc::new(TabularReader::new(config.tabular_suffix.clone(), log.clone()));

        let mut rules = AllOf::default().with(Arc::new(ForbiddenMarker::new(
            config.forbidden_marker.clone(),
        )));
        if !config.required_columns.is_empty() {
            rules = rules.with(Arc::new(RequiredColumns::new(
                config.required_columns.clone(),
                reader.clone(),
            )));
        }

        Self::new(
            ScratchStore::new(config.scratch_dir.clone()),
            reader,
            Arc::new(rules),
            log,
        )
    }

    /// Validate an upload and shape the outcome as a [`ValidationResult`].
    ///
    /// Never fails: storage errors, rule errors and failing verdicts all map to
    /// the fixed `Code: 500` body and are written to the failure log.
    pub async fn validate_upload(&self, bytes: &[u8], display_name: &str) -> ValidationResult {
        match self.run_validation(bytes, display_name).await {
            Ok(verdict) if verdict.is_pass() => ValidationResult::ok(),
            Ok(verdict) => {
                let rejection = IngestError::validation(
                    verdict.message.clone().unwrap_or_else(|| "rejected".to_string()),
                    verdict.code.clone(),
                );
                self.record_validation_failure(display_name, &rejection.to_string());
                ValidationResult::from_verdict(&verdict)
            }
            Err(e) => {
                self.record_validation_failure(display_name, &format!("Validation failed: {}", e));
                ValidationResult::failed()
            }
        }
    }

    async fn run_validation(
        &self,
        bytes: &[u8],
        display_name: &str,
    ) -> IngestResult<ValidationVerdict> {
        let mut file = self.store.store(bytes, display_name).await?;
        let verdict = self.validator.validate(&file).await;
        file.release();
        verdict
    }

    /// Store an upload and parse it as a tab-delimited table.
    pub async fn read_upload(&self, bytes: &[u8], display_name: &str) -> IngestResult<TabularTable> {
        let mut file = match self.store.store(bytes, display_name).await {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(name = display_name, error = %e, "failed to store upload");
                self.log
                    .record(&format!("Error storing file {}: {}", display_name, e));
                return Err(e);
            }
        };
        let table = self.reader.read(&file).await;
        file.release();
        table
    }

    fn record_validation_failure(&self, display_name: &str, line: &str) {
        tracing::warn!(name = display_name, "{}", line);
        self.log.record(line);
    }
}
