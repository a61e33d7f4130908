//! Durable progress: a SQLite table and a JSON snapshot kept in step.
//!
//! Both copies are written on every save. On load they are reconciled per
//! character, the database winning wherever both have a value.

use crate::proficiency::ProficiencyTable;
use crate::session::SessionState;
use crate::snapshot::{SnapshotData, SnapshotFile};
use crate::stats::StatsDb;
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "kana_practice.db";
pub const SNAPSHOT_FILE_NAME: &str = "kana_stats.json";

/// Error type for progress storage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {target}: {source}")]
    WriteFailure {
        target: &'static str,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    fn write_failure(target: &'static str, source: StoreError) -> Self {
        StoreError::WriteFailure {
            target,
            source: Box::new(source),
        }
    }
}

/// Everything the evaluator mutates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub records: ProficiencyTable,
    pub session: SessionState,
}

impl Progress {
    /// A zero record for every known character and a zero session
    pub fn zeroed() -> Self {
        Self {
            records: ProficiencyTable::zeroed(),
            session: SessionState::default(),
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::zeroed()
    }
}

pub trait ProgressStore {
    /// Restore saved progress. Missing or unreadable storage yields zeroed progress.
    fn load(&mut self) -> Progress;

    fn save(&mut self, progress: &Progress) -> Result<(), StoreError>;

    /// Persist zeroed progress and return it
    fn reset(&mut self) -> Result<Progress, StoreError> {
        let progress = Progress::zeroed();
        self.save(&progress)?;
        Ok(progress)
    }
}

/// Merge the database and snapshot copies. The database wins per character
/// and for the session; anything neither copy knows about starts at zero.
pub fn reconcile(
    db: Option<(ProficiencyTable, Option<SessionState>)>,
    snapshot: Option<SnapshotData>,
) -> Progress {
    let (snapshot_records, snapshot_session) = match snapshot {
        Some(data) => (data.correct_counts, data.session),
        None => (ProficiencyTable::default(), None),
    };
    let (db_records, db_session) = db.unwrap_or_default();

    let mut records = snapshot_records.clone();
    let mut disagreements = 0;
    for (character, record) in db_records.iter() {
        if snapshot_records.contains(character) && snapshot_records.get(character) != record {
            disagreements += 1;
        }
        records.insert(character, record);
    }
    if disagreements > 0 {
        log::warn!(
            "stats database and snapshot disagree on {disagreements} characters, using the database"
        );
    }
    records.fill_missing();

    Progress {
        records,
        session: db_session.or(snapshot_session).unwrap_or_default(),
    }
}

/// The production store: `kana_practice.db` plus `kana_stats.json`
#[derive(Debug)]
pub struct DualStore {
    db_path: PathBuf,
    db: Option<StatsDb>,
    snapshot: SnapshotFile,
}

impl DualStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(db_path: P, snapshot_path: Q) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            db: None,
            snapshot: SnapshotFile::with_path(snapshot_path),
        }
    }

    /// Store with both files under `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DB_FILE_NAME), dir.join(SNAPSHOT_FILE_NAME))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn snapshot_path(&self) -> &Path {
        self.snapshot.path()
    }

    /// The open database, opening it on first use
    fn db(&mut self) -> Result<&mut StatsDb, StoreError> {
        let db = match self.db.take() {
            Some(db) => db,
            None => StatsDb::open(&self.db_path)?,
        };
        Ok(self.db.insert(db))
    }

    fn load_db(&mut self) -> Result<(ProficiencyTable, Option<SessionState>), StoreError> {
        let db = self.db()?;
        Ok((db.load_records()?, db.load_session()?))
    }

    fn reconcile_with_snapshot(
        &self,
        db: Option<(ProficiencyTable, Option<SessionState>)>,
    ) -> Progress {
        let snapshot = match self.snapshot.read() {
            Ok(data) => data,
            Err(e) => {
                log::warn!(
                    "snapshot {} unreadable, ignoring it: {e}",
                    self.snapshot.path().display()
                );
                None
            }
        };

        if db.as_ref().map_or(true, |(records, _)| records.is_empty()) && snapshot.is_none() {
            log::info!("no saved progress found, starting fresh");
        }

        reconcile(db, snapshot)
    }

    /// Like [`ProgressStore::load`], but never creates the data directory or
    /// an empty database. For read-only reports.
    pub fn load_existing(&mut self) -> Progress {
        if self.db.is_none() && !self.db_path.is_file() {
            log::info!("no stats database at {}", self.db_path.display());
            return self.reconcile_with_snapshot(None);
        }
        self.load()
    }
}

impl ProgressStore for DualStore {
    fn load(&mut self) -> Progress {
        let db = match self.load_db() {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                log::warn!(
                    "stats database {} unavailable, falling back: {e}",
                    self.db_path.display()
                );
                None
            }
        };
        self.reconcile_with_snapshot(db)
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StoreError> {
        // Both targets are always attempted so one failure doesn't leave the other stale.
        let db_result = self
            .db()
            .and_then(|db| Ok(db.replace_all(&progress.records, &progress.session)?))
            .map_err(|e| StoreError::write_failure("stats database", e));
        let snapshot_result = self
            .snapshot
            .write(&progress.records, &progress.session)
            .map_err(|e| StoreError::write_failure("snapshot file", e));

        for result in [&db_result, &snapshot_result] {
            if let Err(e) = result {
                log::warn!("{e}");
            }
        }
        db_result?;
        snapshot_result?;

        log::info!(
            "saved progress to {} and {}",
            self.db_path.display(),
            self.snapshot.path().display()
        );
        Ok(())
    }
}

/// Store that keeps progress in memory; handy for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub saved: Option<Progress>,
    pub saves: usize,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: Progress) -> Self {
        Self {
            saved: Some(progress),
            ..Self::default()
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Progress {
        self.saved.clone().unwrap_or_default()
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::write_failure(
                "memory store",
                StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "writes disabled",
                )),
            ));
        }
        self.saved = Some(progress.clone());
        self.saves += 1;
        Ok(())
    }
}
