use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// The log keeps only the most recent sends.
pub const HISTORY_CAP: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("notification not found")]
    NotFound,
    #[error("history write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One completed send. Records are append-only; they are never edited,
/// only evicted by the cap or removed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    pub interest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Newest-first send history persisted as a single JSON document.
///
/// Reads treat a missing or unparseable document as an empty log; the store
/// trades history loss for availability rather than failing a send over a
/// corrupted file. Writes replace the whole document, serialized through an
/// in-process mutex so concurrent read-modify-write cycles cannot
/// interleave.
#[derive(Clone)]
pub struct HistoryStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Prepends `record` and persists the trimmed log. Entries beyond the
    /// cap fall off the end.
    pub async fn append(&self, record: HistoryRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut log = self.load().await;
        log.insert(0, record);
        log.truncate(HISTORY_CAP);
        self.persist(&log).await
    }

    /// Current log, newest-first. Empty on any read problem.
    pub async fn list(&self) -> Vec<HistoryRecord> {
        self.load().await
    }

    /// Removes the record with `id`, or reports `NotFound` and leaves the
    /// document untouched.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let log = self.load().await;
        let filtered: Vec<HistoryRecord> = log
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect();
        if filtered.len() == log.len() {
            return Err(StoreError::NotFound);
        }
        self.persist(&filtered).await
    }

    async fn load(&self) -> Vec<HistoryRecord> {
        let raw = match tokio::fs::read_to_string(self.path.as_path()).await {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "history document unparseable, starting from an empty log"
                );
                Vec::new()
            }
        }
    }

    async fn persist(&self, log: &[HistoryRecord]) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(log)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(self.path.as_path(), raw).await?;
        Ok(())
    }
}
