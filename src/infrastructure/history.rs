use crate::domain::entities::{HistoryRecord, Method, RequestDraft};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Second precision; two sends of one method in the same second share a file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Writes one JSON file per dispatched request
pub struct HistoryRecorder {
    dir: PathBuf,
}

impl HistoryRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record(&self, draft: &RequestDraft) -> Result<PathBuf> {
        self.record_at(draft, Local::now())
    }

    /// Saves `draft` as `<METHOD>_<timestamp>.json`, replacing any file of that name
    pub fn record_at(&self, draft: &RequestDraft, at: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating history directory {}", self.dir.display()))?;

        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let path = self.dir.join(Self::file_name(draft.method, &timestamp));
        let record = HistoryRecord::from_draft(draft, timestamp);

        let data = serde_json::to_string_pretty(&record)?;
        fs::write(&path, data)
            .with_context(|| format!("writing history file {}", path.display()))?;

        tracing::debug!(path = %path.display(), "request saved to history");
        Ok(path)
    }

    pub fn file_name(method: Method, timestamp: &str) -> String {
        format!("{}_{}.json", method, timestamp)
    }
}
