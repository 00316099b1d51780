//! Durable snapshot of the history buffer.
//!
//! The snapshot is a single JSON document, overwritten each cycle rather
//! than appended. The write goes through a temp file and a rename so a
//! crash mid-write never leaves a torn snapshot behind.

use std::path::{Path, PathBuf};

use crate::domain::HistorySnapshot;
use crate::error::SnapshotError;

pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn write(&self, snapshot: &HistorySnapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(snapshot)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|source| SnapshotError::Write {
                path: tmp.display().to_string(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| SnapshotError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
