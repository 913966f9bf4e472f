//! Streaming team-ACS generator for the match statistics store.
//!
//! One process, one loop: discover the set of teams once at startup, seed a
//! bounded random walk per team, then every cycle advance the walk and append
//! one sample per team to the `team_acs_stream` table as a single atomic
//! batch, until cancelled.
//!
//! RULES:
//!   - Only store.rs talks to the database.
//!   - All randomness flows through the injectable StepSource trait.
//!   - Advancing the walk and persisting the batch are separate steps;
//!     persistence never mutates walk state.

pub mod config;
pub mod error;
pub mod registry;
pub mod rng;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod walk;
