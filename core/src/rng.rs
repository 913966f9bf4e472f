//! Deterministic random number generation.
//!
//! RULE: The walk never calls any platform RNG. All randomness flows
//! through StepSource implementations handed out by the RngBank.
//!
//! Each team gets its own RNG stream, seeded deterministically from
//! (master_seed XOR hash(team name)). This means:
//!   - Adding or removing a team never changes another team's stream.
//!   - Each team's stream is fully reproducible in isolation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// An injectable source of uniform draws. Production code uses [`WalkRng`];
/// tests substitute scripted sources to make the walk fully predictable.
pub trait StepSource: Send {
    /// Draw a value uniformly from [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

/// A named, deterministic RNG stream for a single team.
pub struct WalkRng {
    inner: Pcg64Mcg,
}

impl WalkRng {
    /// Derive a team's stream from the master seed and the team name.
    pub fn for_team(master_seed: u64, team: &str) -> Self {
        let derived = master_seed ^ fnv1a(team).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl StepSource for WalkRng {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// All per-team RNG streams for a single run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_team(&self, team: &str) -> WalkRng {
        WalkRng::for_team(self.master_seed, team)
    }
}

/// FNV-1a over the team name. Stable across platforms and runs — the
/// derived seeds must never depend on hasher randomization.
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
