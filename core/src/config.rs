//! Environment-supplied configuration.
//!
//! The runner loads this once at startup. A missing or unparsable required
//! option is a fatal startup error — there is no degraded mode.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seconds between cycle starts when STREAM_INTERVAL_SECS is unset.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Teams to simulate when the store has no historical player stats yet.
/// Only a default — operators override it via STREAM_FALLBACK_TEAMS.
pub const DEFAULT_FALLBACK_TEAMS: [&str; 3] = ["Team Alpha", "Team Beta", "Team Gamma"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Path to the SQLite database (STREAM_DB). Required.
    pub db_path: String,
    /// Inter-cycle suspension (STREAM_INTERVAL_SECS).
    pub interval: Duration,
    /// Master seed for the per-team RNG streams (STREAM_SEED).
    pub seed: u64,
    /// Teams used when discovery yields an empty set (STREAM_FALLBACK_TEAMS).
    pub fallback_teams: Vec<String>,
}

impl StreamConfig {
    /// Load from the environment. `db_override` (e.g. a --db flag) takes
    /// precedence over STREAM_DB.
    pub fn from_env(db_override: Option<&str>) -> anyhow::Result<Self> {
        let db_path = match db_override {
            Some(path) => path.to_string(),
            None => std::env::var("STREAM_DB")
                .map_err(|_| anyhow::anyhow!("STREAM_DB is not set and no --db was given"))?,
        };

        let interval_secs = match std::env::var("STREAM_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("STREAM_INTERVAL_SECS: {e}"))?,
            Err(_) => DEFAULT_INTERVAL_SECS,
        };

        let seed = match std::env::var("STREAM_SEED") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("STREAM_SEED: {e}"))?,
            Err(_) => seed_from_clock(),
        };

        let fallback_teams = match std::env::var("STREAM_FALLBACK_TEAMS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => DEFAULT_FALLBACK_TEAMS.iter().map(|t| t.to_string()).collect(),
        };

        Ok(Self {
            db_path,
            interval: Duration::from_secs(interval_secs),
            seed,
            fallback_teams,
        })
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".into(),
            interval: Duration::from_millis(0),
            seed: 42,
            fallback_teams: DEFAULT_FALLBACK_TEAMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Wall-clock-derived seed for runs where reproducibility is not requested.
pub fn seed_from_clock() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
