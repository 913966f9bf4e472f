//! Team discovery.
//!
//! Runs exactly once at process start; the returned set is frozen for the
//! process lifetime. A store error here is fatal — there is no partial or
//! degraded startup.

use crate::{error::StreamResult, store::MetricsStore, types::Team};

/// Resolve the set of teams to simulate: the distinct non-empty team names
/// referenced by historical player stats, or `fallback` when the store has
/// none yet (e.g. an uninitialized database).
pub fn discover_teams(store: &MetricsStore, fallback: &[String]) -> StreamResult<Vec<Team>> {
    let discovered = store.distinct_teams()?;
    if discovered.is_empty() {
        log::warn!(
            "no teams in player stats, using {} fallback team(s)",
            fallback.len()
        );
        return Ok(fallback.to_vec());
    }
    Ok(discovered)
}
