//! Shared primitive types used across the generator.

/// A team identifier, as scraped into the match-stats tables.
pub type Team = String;

/// A cycle counter. One cycle = one persisted batch.
pub type Cycle = u64;
