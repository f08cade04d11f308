//! SQLite persistence for generated datasets.
//!
//! RULE: Only the store talks to the database.
//! Generation never touches it; the engine hands finished households over.

mod household;

use crate::error::CoreResult;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    pub fn open(path: &str) -> CoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> CoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_households.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        as_of: DateTime<Utc>,
    ) -> CoreResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, as_of) VALUES (?1, ?2, ?3, ?4)",
            params![
                run_id,
                seed as i64,
                version,
                as_of.to_rfc3339_opts(SecondsFormat::Millis, true),
            ],
        )?;
        Ok(())
    }

    /// Seed recorded for a run, if the run exists.
    pub fn run_seed(&self, run_id: &str) -> CoreResult<Option<u64>> {
        let seed = self
            .conn
            .query_row(
                "SELECT seed FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(seed.map(|s| s as u64))
    }
}
