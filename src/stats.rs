use crate::proficiency::{ProficiencyRecord, ProficiencyTable};
use crate::session::SessionState;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS proficiency_stats (
        char TEXT PRIMARY KEY,
        correct INTEGER NOT NULL DEFAULT 0,
        total INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT
    );
    CREATE TABLE IF NOT EXISTS session_stats (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        streak INTEGER NOT NULL DEFAULT 0,
        high_score INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT
    );
"#;

/// Structured copy of the learner's progress, one row per character
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open (or create) the database at `path` and make sure the tables exist
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(StatsDb { conn })
    }

    /// Every stored character row. Characters without a row are absent.
    pub fn load_records(&self) -> Result<ProficiencyTable> {
        let mut stmt = self
            .conn
            .prepare("SELECT char, correct, total FROM proficiency_stats ORDER BY char")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut table = ProficiencyTable::default();
        for row in rows {
            let (character, correct, total) = row?;
            table.insert(
                character,
                ProficiencyRecord::new(non_negative(correct), non_negative(total)),
            );
        }

        Ok(table)
    }

    /// The stored streak state, if a session row was ever written
    pub fn load_session(&self) -> Result<Option<SessionState>> {
        self.conn
            .query_row(
                "SELECT streak, high_score FROM session_stats WHERE id = 1",
                [],
                |row| {
                    Ok(SessionState::new(
                        non_negative(row.get(0)?),
                        non_negative(row.get(1)?),
                    ))
                },
            )
            .optional()
    }

    /// Replace everything stored with `records` and `session` in one transaction
    pub fn replace_all(&mut self, records: &ProficiencyTable, session: &SessionState) -> Result<()> {
        let now = Local::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM proficiency_stats", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO proficiency_stats (char, correct, total, updated_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (character, record) in records.iter() {
                insert.execute(params![
                    character,
                    to_sql_count(record.correct()),
                    to_sql_count(record.total()),
                    now,
                ])?;
            }
        }

        tx.execute(
            r#"
            INSERT OR REPLACE INTO session_stats (id, streak, high_score, updated_at)
            VALUES (1, ?1, ?2, ?3)
            "#,
            params![
                to_sql_count(session.streak),
                to_sql_count(session.high_score),
                now
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Number of character rows stored
    pub fn record_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM proficiency_stats", [], |row| row.get(0))?;
        Ok(non_negative(count) as usize)
    }
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_else(|_| {
        log::warn!("negative count {value} in stats database, treating as 0");
        0
    })
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
