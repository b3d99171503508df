//! Scratch files for uploaded request bodies.
//!
//! A [`ScratchFile`] is created by [`ScratchStore::store`] and removed either
//! by an explicit [`ScratchFile::release`] or when the handle is dropped. The
//! handle exists before the first byte is written, so a write that fails or a
//! request future that is cancelled mid-write still leaves nothing behind.
//!
//! One window remains: `tokio::fs` opens the file on a blocking thread, and a
//! future dropped while that open is in flight never receives the handle.
//! [`ScratchStore::sweep_orphans`] removes such files at startup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{ErrorContext, IngestError, IngestResult};

/// Display name used when the client does not supply one.
pub const DEFAULT_UPLOAD_NAME: &str = "upload.txt";

const MAX_NAME_LEN: usize = 100;

const SCRATCH_PREFIX: &str = "edx-";

/// Creates scratch files under a single directory.
#[derive(Debug, Clone)]
pub struct ScratchStore {
    dir: PathBuf,
}

impl ScratchStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to a new, uniquely named scratch file.
    ///
    /// The file name is `edx-<uuid>-<name>`, with the name reduced to a safe
    /// single path component. The handle keeps `display_name` exactly as given.
    pub async fn store(&self, bytes: &[u8], display_name: &str) -> IngestResult<ScratchFile> {
        let path = self.dir.join(format!(
            "{}{}-{}",
            SCRATCH_PREFIX,
            Uuid::new_v4(),
            sanitize_name(display_name)
        ));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| IngestError::io(&e, ErrorContext::new("store").with_path(&path)))?;

        let mut scratch = ScratchFile {
            path,
            display_name: display_name.to_string(),
            len: 0,
            released: false,
        };

        let write_ctx = || ErrorContext::new("store").with_path(&scratch.path);
        file.write_all(bytes)
            .await
            .map_err(|e| IngestError::io(&e, write_ctx()))?;
        file.flush()
            .await
            .map_err(|e| IngestError::io(&e, write_ctx()))?;
        drop(file);

        scratch.len = bytes.len() as u64;
        tracing::debug!(path = %scratch.path.display(), bytes = scratch.len, "stored scratch file");
        Ok(scratch)
    }

    /// Remove scratch files left behind by an earlier process.
    ///
    /// Only entries named `edx-<uuid>-...` whose last modification is at
    /// least `min_age` old are touched. Returns the number removed.
    pub async fn sweep_orphans(&self, min_age: Duration) -> IngestResult<usize> {
        let ctx = || ErrorContext::new("sweep").with_path(&self.dir);
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| IngestError::io(&e, ctx()))?;

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| IngestError::io(&e, ctx()))?
        {
            let name = entry.file_name();
            if !name.to_str().is_some_and(is_scratch_name) {
                continue;
            }
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            let age = meta
                .modified()
                .ok()
                .and_then(|m| SystemTime::now().duration_since(m).ok())
                .unwrap_or_default();
            if !meta.is_file() || age < min_age {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "failed to sweep scratch file");
                }
            }
        }

        if removed > 0 {
            tracing::info!(dir = %self.dir.display(), removed, "swept orphaned scratch files");
        }
        Ok(removed)
    }
}

fn is_scratch_name(name: &str) -> bool {
    name.strip_prefix(SCRATCH_PREFIX)
        .and_then(|rest| rest.get(..36).zip(rest.get(36..37)))
        .is_some_and(|(id, sep)| sep == "-" && Uuid::parse_str(id).is_ok())
}

/// Handle to one request's scratch file.
///
/// Not `Clone`: exactly one owner is responsible for removing the file.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    display_name: String,
    len: u64,
    released: bool,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The upload name exactly as the client sent it, e.g. `sample.txt`.
    /// Only the on-disk path is sanitized.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Final component of the scratch path.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Read the stored bytes back.
    pub async fn read_bytes(&self) -> IngestResult<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            IngestError::io(
                &e,
                ErrorContext::new("read_scratch")
                    .with_path(&self.path)
                    .with_details(format!("display_name={}", self.display_name)),
            )
        })
    }

    /// Remove the file. Returns `Ok(true)` if this call removed it and
    /// `Ok(false)` if it was already gone or already released.
    ///
    /// Synchronous so that `Drop` can call it.
    pub fn try_release(&mut self) -> IngestResult<bool> {
        if self.released {
            return Ok(false);
        }
        self.released = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "released scratch file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(IngestError::io(
                &e,
                ErrorContext::new("release").with_path(&self.path),
            )),
        }
    }

    /// Remove the file, logging instead of returning any failure.
    pub fn release(&mut self) {
        if let Err(e) = self.try_release() {
            tracing::warn!(error = %e, "failed to remove scratch file");
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.release();
    }
}

/// Reduce a client-supplied name to a single safe path component.
///
/// Directory parts are dropped, anything outside `[A-Za-z0-9._-]` becomes
/// `_`, and long names keep their tail so the suffix survives.
pub(crate) fn sanitize_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        return DEFAULT_UPLOAD_NAME.to_string();
    }

    if cleaned.len() > MAX_NAME_LEN {
        cleaned[cleaned.len() - MAX_NAME_LEN..].to_string()
    } else {
        cleaned
    }
}
