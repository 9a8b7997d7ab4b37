//! File-backed audit store.
//!
//! Entries live in `entries.log` inside the configured directory, one JSON
//! object per line. The file is strictly append-only: an approval decision
//! appends a superseding record for the same correlation id instead of
//! rewriting the original line, so the on-disk history keeps both the
//! pending and the decided form. On reload, the last record for an id wins.

use crate::error::StoreError;
use crate::index::EntryIndex;
use crate::store::AuditStore;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use vigil_core::{ActionType, ApprovalStatus, AuditLogEntry};

const LOG_FILE: &str = "entries.log";

/// Audit store persisted as a JSON Lines log.
pub struct FileStore {
    path: PathBuf,
    inner: RwLock<EntryIndex>,
}

impl FileStore {
    /// Open (or create) the store in `directory`, replaying any existing log.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, StoreError> {
        let directory = directory.as_ref();
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }
        let path = directory.join(LOG_FILE);

        let mut index = EntryIndex::default();
        if path.exists() {
            let file = fs::File::open(&path)?;
            let reader = BufReader::new(file);
            for (line_num, line) in reader.lines().enumerate() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<AuditLogEntry>(line) {
                    Ok(entry) => index.replay(entry),
                    Err(e) => {
                        tracing::warn!(
                            "skipping unparseable audit record on line {} of {}: {}",
                            line_num + 1,
                            path.display(),
                            e
                        );
                    }
                }
            }
        }
        tracing::info!(entries = index.len(), path = %path.display(), "audit log loaded");

        Ok(Self {
            path,
            inner: RwLock::new(index),
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_record(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        let json = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

#[async_trait]
impl AuditStore for FileStore {
    async fn append(&self, entry: AuditLogEntry) -> Result<String, StoreError> {
        // The write lock is held across conflict check and disk append so a
        // raced duplicate cannot slip between them.
        let mut inner = self.inner.write().map_err(|_| StoreError::lock())?;
        let id = entry.correlation_id.clone();
        if inner.contains(&id) {
            return Err(StoreError::Conflict(id));
        }
        self.append_record(&entry)?;
        inner
            .insert(entry)
            .map_err(StoreError::Conflict)?;
        tracing::debug!(correlation_id = %id, "audit entry appended");
        Ok(id)
    }

    async fn get(&self, correlation_id: &str) -> Result<Option<AuditLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.get(correlation_id).cloned())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<AuditLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.pending(limit))
    }

    async fn update_approval_status(
        &self,
        correlation_id: &str,
        new_status: ApprovalStatus,
        actor_id: &str,
        reason: Option<&str>,
    ) -> Result<bool, StoreError> {
        if !new_status.is_decision() {
            return Err(StoreError::InvalidDecision(new_status));
        }

        let mut inner = self.inner.write().map_err(|_| StoreError::lock())?;
        let updated =
            inner.apply_decision(correlation_id, new_status, actor_id, reason, Utc::now());

        match updated {
            Some(entry) => {
                self.append_record(&entry)?;
                tracing::info!(
                    correlation_id = %entry.correlation_id,
                    status = %entry.approval_status,
                    decided_by = %actor_id,
                    "approval status updated"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_actor(
        &self,
        actor_id: &str,
        action_type: Option<ActionType>,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.by_actor(actor_id, action_type, limit))
    }

    async fn count_recent(
        &self,
        actor_id: &str,
        action_type: ActionType,
        since_window: Duration,
    ) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::lock())?;
        Ok(inner.count_since(actor_id, action_type, Utc::now() - since_window))
    }
}
