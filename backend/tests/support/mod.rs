#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use edx_ingest::config::ServiceConfig;
use edx_ingest::logging::MemoryLog;
use edx_ingest::pipeline::IngestPipeline;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A pipeline writing to its own scratch directory and an in-memory log.
pub struct Harness {
    pub scratch: TempDir,
    pub log: Arc<MemoryLog>,
    pub pipeline: Arc<IngestPipeline>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(customize: impl FnOnce(&mut ServiceConfig)) -> Self {
        let scratch = tempfile::tempdir().expect("create scratch dir");
        let mut config = ServiceConfig {
            scratch_dir: scratch.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        customize(&mut config);

        let log = Arc::new(MemoryLog::new());
        let pipeline = Arc::new(IngestPipeline::from_config(&config, log.clone()));
        Self {
            scratch,
            log,
            pipeline,
        }
    }

    /// Number of files currently in the scratch directory.
    pub fn scratch_files(&self) -> usize {
        count_entries(self.scratch.path())
    }
}

pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// Runs `f` with environment variables set (`Some`) or removed (`None`),
/// restoring the previous values afterwards even if `f` panics.
///
/// Calls are serialized because the environment is process-global.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore(Vec<(String, Option<String>)>);

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let previous = changes
            .iter()
            .map(|(k, _)| (k.to_string(), std::env::var(k).ok()))
            .collect();
        for (k, v) in changes {
            set_or_remove(k, v.as_deref());
        }
        Self(previous)
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (k, v) in self.0.iter().rev() {
            set_or_remove(k, v.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}
