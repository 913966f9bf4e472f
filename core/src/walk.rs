//! The per-team random walk — the state model of the generator.
//!
//! Each team holds its last emitted value and its own step source. One
//! advance produces exactly one sample per team. The walk is pure in-memory
//! state: restarting the process re-seeds it independently of anything
//! previously written to the store.

use crate::{
    rng::{RngBank, StepSource},
    types::Team,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Range initial values are drawn from, a realistic team-average ACS.
pub const SEED_RANGE: (f64, f64) = (180.0, 260.0);

/// Largest per-cycle move in either direction.
pub const MAX_STEP: f64 = 10.0;

/// One emitted observation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub team: Team,
    pub ts: DateTime<Utc>,
    pub value: f64,
}

struct TeamState {
    last_value: f64,
    steps: Box<dyn StepSource>,
}

/// Last emitted value per team, evolved by a bounded random walk floored
/// at zero. BTreeMap keeps iteration order stable across runs.
pub struct TeamWalk {
    teams: BTreeMap<Team, TeamState>,
}

impl TeamWalk {
    /// Seed every team's initial value uniformly from [`SEED_RANGE`], each
    /// team drawing from its own stream out of the bank.
    pub fn seed(teams: &[Team], bank: &RngBank) -> Self {
        let teams = teams
            .iter()
            .map(|team| {
                let mut rng = bank.for_team(team);
                let initial = round2(rng.uniform(SEED_RANGE.0, SEED_RANGE.1));
                (
                    team.clone(),
                    TeamState {
                        last_value: initial,
                        steps: Box::new(rng),
                    },
                )
            })
            .collect();
        Self { teams }
    }

    /// Build a walk from explicit initial values and step sources.
    /// Used by tests to script exact trajectories.
    pub fn with_sources(entries: Vec<(Team, f64, Box<dyn StepSource>)>) -> Self {
        let teams = entries
            .into_iter()
            .map(|(team, initial, steps)| {
                (
                    team,
                    TeamState {
                        last_value: initial.max(0.0),
                        steps,
                    },
                )
            })
            .collect();
        Self { teams }
    }

    /// Advance every team by one independently drawn step and return the
    /// cycle's batch. The clamp at zero is a floor, not a reflection: a
    /// large negative step pins the value at 0.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<Sample> {
        self.teams
            .iter_mut()
            .map(|(team, state)| {
                let step = state.steps.uniform(-MAX_STEP, MAX_STEP);
                let new_value = round2((state.last_value + step).max(0.0));
                state.last_value = new_value;
                Sample {
                    team: team.clone(),
                    ts: now,
                    value: new_value,
                }
            })
            .collect()
    }

    pub fn last_value(&self, team: &str) -> Option<f64> {
        self.teams.get(team).map(|s| s.last_value)
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
