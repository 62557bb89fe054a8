//! On-disk layer: one pretty-printed JSON file per project record.

use crate::{KeelError, Result};
use keel_types::ProjectRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const RECORD_EXTENSION: &str = "json";

/// Directory holding `<project_id>.json` files.
///
/// This is the authoritative copy of every record. Writes replace the whole
/// file; there is no atomic rename, so a crash mid-write can corrupt that one
/// file.
#[derive(Debug, Clone)]
pub struct RecordFiles {
    dir: PathBuf,
}

impl RecordFiles {
    /// Use `dir`, creating it and any parents if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", project_id, RECORD_EXTENSION))
    }

    /// Record files in the directory, sorted by file name.
    ///
    /// Entries that cannot be read are logged and skipped.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir)?.map(|entry| entry.map(|e| e.path()));
        Ok(self.record_paths(entries))
    }

    fn record_paths(&self, entries: impl Iterator<Item = std::io::Result<PathBuf>>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(target: "keel::load", "Skipping unreadable entry in {:?}: {}", self.dir, e);
                    continue;
                }
            };
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
            {
                paths.push(path);
            }
        }
        paths.sort();
        paths
    }

    /// Read and parse one record file.
    pub fn read(&self, path: &Path) -> Result<ProjectRecord> {
        let content = std::fs::read_to_string(path).map_err(|e| KeelError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| KeelError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse every record file. Files that fail are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<ProjectRecord>> {
        let mut records = Vec::new();
        for path in self.list()? {
            match self.read(&path) {
                Ok(record) => {
                    info!(
                        target: "keel::load",
                        "Loaded project: {} ({})", record.name, record.project_id
                    );
                    records.push(record);
                }
                Err(e) => {
                    error!(target: "keel::load", "Error loading project config: {}", e);
                }
            }
        }
        Ok(records)
    }

    /// Serialize a record the way it is stored on disk.
    pub fn encode(record: &ProjectRecord) -> Result<String> {
        Ok(serde_json::to_string_pretty(record)?)
    }

    /// Overwrite the record's file with its full current state.
    pub fn write(&self, record: &ProjectRecord) -> Result<PathBuf> {
        let content = Self::encode(record)?;
        self.write_encoded(record, content)
    }

    /// Write content already produced by [`RecordFiles::encode`] for `record`.
    pub fn write_encoded(&self, record: &ProjectRecord, content: String) -> Result<PathBuf> {
        let path = self.path_for(&record.project_id);
        std::fs::write(&path, content).map_err(|source| KeelError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(target: "keel::store", "Saved project config: {} -> {:?}", record.name, path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_types::{NewProject, Timestamp};
    use tempfile::TempDir;

    fn record(id: &str) -> ProjectRecord {
        ProjectRecord::new(
            id.to_string(),
            NewProject::new("Alpha", "/tmp/alpha"),
            Timestamp::from("2024-01-01T00:00:00.000000Z"),
        )
    }

    #[test]
    fn test_open_creates_nested_dir_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a").join("b");
        RecordFiles::open(&dir).unwrap();
        RecordFiles::open(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        let original = record("proj_000000000001");

        let path = files.write(&original).unwrap();
        assert_eq!(path, temp_dir.path().join("proj_000000000001.json"));
        assert_eq!(files.read(&path).unwrap(), original);
    }

    #[test]
    fn test_list_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        files.write(&record("proj_000000000001")).unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "hi").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

        assert_eq!(files.list().unwrap().len(), 1);
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        let good = files.write(&record("proj_000000000001")).unwrap();

        let entries = vec![
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
            Ok(good.clone()),
        ];
        assert_eq!(files.record_paths(entries.into_iter()), vec![good]);
    }

    #[test]
    fn test_load_all_skips_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        files.write(&record("proj_000000000001")).unwrap();
        std::fs::write(temp_dir.path().join("proj_broken00000.json"), "{ not json").unwrap();

        let records = files.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].project_id, "proj_000000000001");
    }

    #[test]
    fn test_read_reports_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        let path = temp_dir.path().join("proj_x.json");
        std::fs::write(&path, r#"{"project_id": "proj_x"}"#).unwrap();

        match files.read(&path) {
            Err(KeelError::Load { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        // A directory where the file should go makes the write fail
        std::fs::create_dir(files.path_for("proj_000000000001")).unwrap();

        let err = files.write(&record("proj_000000000001")).unwrap_err();
        assert!(matches!(err, KeelError::Write { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_encode_rejects_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let files = RecordFiles::open(temp_dir.path()).unwrap();
        let bad = ProjectRecord::new(
            "proj_000000000001".to_string(),
            NewProject::new("Bad", PathBuf::from(OsStr::from_bytes(b"/tmp/bad\xff"))),
            Timestamp::from("2024-01-01T00:00:00.000000Z"),
        );

        assert!(matches!(RecordFiles::encode(&bad), Err(KeelError::Json(_))));
        assert!(files.write(&bad).is_err());
        assert!(!files.path_for("proj_000000000001").exists());
    }
}
