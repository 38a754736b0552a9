//! JSONL audit trail writer
//!
//! Each audit entry is serialized as a single JSON line with a `type`
//! field, appended via a buffered writer. Audit is fire-and-forget: every
//! failure here is logged and swallowed.

use conclave_application::{AnalysisRecord, AuditLog, ModerationAuditEntry};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL audit log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every write and on
/// `Drop`; the file is opened in append mode so restarts extend the trail.
pub struct JsonlAuditLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Create a new audit log writing to the given path.
    ///
    /// Creates parent directories if needed. Returns `None` if the file
    /// cannot be opened, letting callers degrade to no auditing.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create audit directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append<T: Serialize>(&self, entry_type: &str, entry: &T) {
        let record = match serde_json::to_value(entry) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "type".to_string(),
                    serde_json::Value::String(entry_type.to_string()),
                );
                serde_json::Value::Object(map)
            }
            Ok(other) => serde_json::json!({ "type": entry_type, "data": other }),
            Err(e) => {
                warn!("Could not serialize audit entry: {}", e);
                return;
            }
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl AuditLog for JsonlAuditLog {
    fn record_moderation(&self, entry: ModerationAuditEntry) {
        self.append("moderation", &entry);
    }

    fn record_analysis(&self, record: AnalysisRecord) {
        self.append("analysis_completed", &record);
    }
}

impl Drop for JsonlAuditLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::ModerationResult;
    use std::io::Read;

    #[test]
    fn test_audit_log_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::new(&path).unwrap();

        log.record_moderation(ModerationAuditEntry::new(
            "Chess Club",
            Some("user-1".to_string()),
            ModerationResult::approved_basic(),
            "basic",
        ));
        log.record_analysis(AnalysisRecord::new("user-1", "sess-1"));
        drop(log);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "moderation");
        assert_eq!(first["subject"], "Chess Club");
        assert!(first.get("timestamp").is_some());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "analysis_completed");
        assert_eq!(second["session_id"], "sess-1");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        for _ in 0..2 {
            let log = JsonlAuditLog::new(&path).unwrap();
            log.record_analysis(AnalysisRecord::new("u", "s"));
        }

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }
}
