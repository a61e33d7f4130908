//! Flat JSON copy of the learner's progress.

use crate::proficiency::ProficiencyTable;
use crate::session::SessionState;
use crate::store::StoreError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub saved_at: Option<DateTime<Local>>,
    pub correct_counts: ProficiencyTable,
    /// Absent in files written before streaks were persisted
    #[serde(default)]
    pub session: Option<SessionState>,
}

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. `Ok(None)` means no file has been written yet.
    pub fn read(&self) -> Result<Option<SnapshotData>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let mut data: SnapshotData = serde_json::from_str(&content)?;

        // Deserialization bypasses the table's consistency checks; run them now.
        let mut repaired = ProficiencyTable::default();
        for (character, record) in data.correct_counts.iter() {
            repaired.insert(character, record);
        }
        data.correct_counts = repaired;

        Ok(Some(data))
    }

    /// Write through a temp file and rename so a crash never leaves a torn file
    pub fn write(
        &self,
        records: &ProficiencyTable,
        session: &SessionState,
    ) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = SnapshotData {
            saved_at: Some(Local::now()),
            correct_counts: records.clone(),
            session: Some(*session),
        };
        let json = serde_json::to_string_pretty(&data)?;

        let tmp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proficiency::ProficiencyRecord;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let file = SnapshotFile::with_path(dir.path().join("kana_stats.json"));
        assert_matches!(file.read(), Ok(None));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let file = SnapshotFile::with_path(dir.path().join("kana_stats.json"));
        let mut records = ProficiencyTable::zeroed();
        records.record("を", true, 3);
        let session = SessionState::new(3, 4);

        file.write(&records, &session).unwrap();
        let data = file.read().unwrap().unwrap();

        assert_eq!(data.correct_counts, records);
        assert_eq!(data.session, Some(session));
        assert!(data.saved_at.is_some());
        assert!(!file.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_reads_counts_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kana_stats.json");
        fs::write(
            &path,
            r#"{"correct_counts": {"あ": {"correct": 2, "total": 3}, "い": {"total": 1}}}"#,
        )
        .unwrap();

        let data = SnapshotFile::with_path(&path).read().unwrap().unwrap();
        assert_eq!(data.correct_counts.get("あ"), ProficiencyRecord::new(2, 3));
        assert_eq!(data.correct_counts.get("い"), ProficiencyRecord::new(0, 1));
        assert_eq!(data.session, None);
    }

    #[test]
    fn test_repairs_inconsistent_counts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kana_stats.json");
        fs::write(&path, r#"{"correct_counts": {"ア": {"correct": 8, "total": 1}}}"#).unwrap();

        let data = SnapshotFile::with_path(&path).read().unwrap().unwrap();
        assert_eq!(data.correct_counts.get("ア"), ProficiencyRecord::new(1, 1));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kana_stats.json");
        fs::write(&path, "not json").unwrap();
        assert_matches!(SnapshotFile::with_path(&path).read(), Err(StoreError::Json(_)));
    }
}
