//! Append-only audit log of deactivation outcomes.
//!
//! The log is the only persisted state of a pass. It is never read back
//! for decision-making and never rewritten — re-runs simply append, which
//! is safe because remote deactivation is idempotent.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{DirectoryError, DirectoryResult};

/// Terminal status of a deactivation attempt.
///
/// Both variants exist so callers can decide which outcomes to persist;
/// the log itself writes whatever it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Deactivated,
    Failed,
}

impl OutcomeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deactivated => "Deactivated",
            Self::Failed => "Failed",
        }
    }
}

/// One terminal outcome for one identity.
#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    pub email: String,
    /// Remote user id, when known by the time the attempt terminated.
    pub user_id: Option<i64>,
    pub status: OutcomeStatus,
    pub timestamp: DateTime<Utc>,
}

impl OutcomeRecord {
    /// Record stamped with the current time.
    #[must_use]
    pub fn now(email: impl Into<String>, user_id: Option<i64>, status: OutcomeStatus) -> Self {
        Self {
            email: email.into(),
            user_id,
            status,
            timestamp: Utc::now(),
        }
    }
}

/// Header row written once per file lifetime.
const HEADER: [&str; 4] = ["Email", "User ID", "Status", "Timestamp"];

/// Append-only CSV sink with a stable 4-column schema.
pub struct AuditLog {
    path: PathBuf,
    writer: csv::Writer<std::fs::File>,
}

impl AuditLog {
    /// Open the destination in append mode.
    ///
    /// The header is written first iff the file is new or empty; existing
    /// rows are never touched.
    pub fn open(path: impl AsRef<Path>) -> DirectoryResult<Self> {
        let path = path.as_ref().to_path_buf();

        let needs_header = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DirectoryError::Audit {
                path: path.display().to_string(),
                source: csv::Error::from(e),
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER).map_err(|e| DirectoryError::Audit {
                path: path.display().to_string(),
                source: e,
            })?;
            debug!(path = %path.display(), "wrote audit log header");
        }

        Ok(Self { path, writer })
    }

    /// Append one outcome row and flush it to disk.
    ///
    /// No dedup, no upsert: every call produces exactly one new row.
    pub fn append(&mut self, record: &OutcomeRecord) -> DirectoryResult<()> {
        let user_id = record.user_id.map(|id| id.to_string()).unwrap_or_default();
        self.writer
            .write_record([
                record.email.as_str(),
                user_id.as_str(),
                record.status.as_str(),
                record.timestamp.to_rfc3339().as_str(),
            ])
            .and_then(|()| self.writer.flush().map_err(csv::Error::from))
            .map_err(|e| DirectoryError::Audit {
                path: self.path.display().to_string(),
                source: e,
            })
    }
}
