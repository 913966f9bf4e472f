//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database. All writes are parameterized,
//! and each cycle's batch goes through a single transaction: either every
//! sample in the cycle becomes visible or none does.

use crate::{error::StreamResult, walk::Sample};
use chrono::SecondsFormat;
use rusqlite::{params, Connection};

pub struct MetricsStore {
    conn: Connection,
}

impl MetricsStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> StreamResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: the reporting scripts read while we append.
        // In-memory and shared-cache databases ignore it; not fatal.
        if let Err(err) = conn.execute_batch("PRAGMA journal_mode=WAL;") {
            log::debug!("journal_mode=WAL not applied: {err}");
        }
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StreamResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Idempotent.
    pub fn migrate(&self) -> StreamResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_match_stats.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_acs_stream.sql"))?;
        Ok(())
    }

    // ── Team discovery ─────────────────────────────────────────

    /// Distinct non-null, non-empty team names from historical player
    /// stats, sorted for a stable iteration order.
    pub fn distinct_teams(&self) -> StreamResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT player_team
             FROM detailed_matches_player_stats
             WHERE player_team IS NOT NULL AND TRIM(player_team) != ''
             ORDER BY player_team ASC",
        )?;
        let teams = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(teams)
    }

    // ── Batch persistence ──────────────────────────────────────

    /// Append one cycle's batch atomically. On any row failure the whole
    /// transaction rolls back; individual rows are never retried.
    pub fn insert_batch(&mut self, batch: &[Sample]) -> StreamResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO team_acs_stream (ts, team, avg_acs) VALUES (?1, ?2, ?3)",
            )?;
            for sample in batch {
                stmt.execute(params![
                    sample.ts.to_rfc3339_opts(SecondsFormat::Millis, true),
                    sample.team,
                    sample.value,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Read helpers (runner summary and tests) ────────────────

    pub fn sample_count(&self) -> StreamResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM team_acs_stream", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// All samples in commit order: (id, ts, team, value).
    pub fn all_samples(&self) -> StreamResult<Vec<(i64, String, String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, ts, team, avg_acs FROM team_acs_stream ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// One team's values in commit order.
    pub fn samples_for_team(&self, team: &str) -> StreamResult<Vec<f64>> {
        let mut stmt = self.conn.prepare(
            "SELECT avg_acs FROM team_acs_stream WHERE team = ?1 ORDER BY id ASC",
        )?;
        let values = stmt
            .query_map(params![team], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    // ── Test fixtures ──────────────────────────────────────────

    /// Insert a minimal historical player-stats row. Tests use this to
    /// exercise team discovery against realistic data.
    pub fn insert_player_stat(
        &self,
        match_id: i64,
        player_name: &str,
        player_team: Option<&str>,
    ) -> StreamResult<()> {
        self.conn.execute(
            "INSERT INTO detailed_matches_player_stats
                 (match_id, player_name, player_team, stat_type)
             VALUES (?1, ?2, ?3, 'map')",
            params![match_id, player_name, player_team],
        )?;
        Ok(())
    }
}
