//! The cycle scheduler — drives the walk at a fixed cadence until cancelled.
//!
//! State machine: Idle (built, teams discovered, walk seeded) → Running
//! (advance → persist → log → suspend, repeated) → Stopped (terminal).
//!
//! RULES:
//!   - Exactly one cycle executes at a time; the store connection is owned
//!     here and never shared.
//!   - The suspension is a cancellable wait, not a blocking sleep.
//!   - Cancellation never aborts an insert already in flight; it prevents
//!     the next cycle from starting.
//!   - The next cycle starts one interval after the previous one completes.
//!     Drift is accepted; double-firing is not.

use crate::{
    config::StreamConfig,
    error::{StreamError, StreamResult},
    registry,
    rng::RngBank,
    store::MetricsStore,
    types::Cycle,
    walk::{Sample, TeamWalk},
};
use chrono::Utc;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Cooperative cancellation signal. `wait_timeout` doubles as the
/// inter-cycle suspension so shutdown latency is bounded by the condvar
/// wakeup, not by the interval length.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Request shutdown and wake any suspended loop.
    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *triggered = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Suspend for up to `dur`, returning early if shutdown is requested.
    /// Returns true when shutdown was triggered.
    pub fn wait_timeout(&self, dur: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = std::time::Instant::now() + dur;
        while !*triggered {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _timeout) = cvar
                .wait_timeout(triggered, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            triggered = guard;
        }
        true
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Retry policy for a failed batch insert: bounded attempts with doubling
/// backoff, at most one batch in flight. The backoff wait observes the
/// shutdown signal.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

pub struct StreamLoop {
    store: MetricsStore,
    walk: TeamWalk,
    interval: Duration,
    retry: RetryPolicy,
    shutdown: ShutdownSignal,
    state: LoopState,
    cycles_completed: Cycle,
}

impl StreamLoop {
    /// Discover teams and seed the walk. Any failure here aborts before the
    /// loop ever enters Running.
    pub fn build(cfg: &StreamConfig, store: MetricsStore) -> StreamResult<Self> {
        let teams = registry::discover_teams(&store, &cfg.fallback_teams)?;
        if teams.is_empty() {
            return Err(StreamError::NoTeams);
        }
        let bank = RngBank::new(cfg.seed);
        let walk = TeamWalk::seed(&teams, &bank);
        log::info!("streaming avg ACS for {} team(s)", walk.team_count());
        Ok(Self::from_parts(store, walk, cfg.interval))
    }

    /// Assemble a loop from already-built parts. Tests use this to inject
    /// scripted walks.
    pub fn from_parts(store: MetricsStore, walk: TeamWalk, interval: Duration) -> Self {
        Self {
            store,
            walk,
            interval,
            retry: RetryPolicy::default(),
            shutdown: ShutdownSignal::new(),
            state: LoopState::Idle,
            cycles_completed: 0,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Handle for the signal handler (or a test) to request shutdown.
    pub fn shutdown_handle(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cycles_completed(&self) -> Cycle {
        self.cycles_completed
    }

    pub fn team_count(&self) -> usize {
        self.walk.team_count()
    }

    /// Run until cancelled. Returns the number of completed cycles.
    pub fn run(&mut self) -> StreamResult<Cycle> {
        self.run_until(None)
    }

    /// Run exactly `n` cycles (no trailing suspension). Used by tests and
    /// the runner's --cycles flag.
    pub fn run_cycles(&mut self, n: Cycle) -> StreamResult<Cycle> {
        self.run_until(Some(n))
    }

    /// Release the loop and hand back the store, e.g. for a final row
    /// count after the run.
    pub fn into_store(self) -> MetricsStore {
        self.store
    }

    fn run_until(&mut self, limit: Option<Cycle>) -> StreamResult<Cycle> {
        self.state = LoopState::Running;
        let result = self.drive(limit);
        // Stopped is terminal whether the loop ended cleanly or on error.
        self.state = LoopState::Stopped;
        result?;
        Ok(self.cycles_completed)
    }

    fn drive(&mut self, limit: Option<Cycle>) -> StreamResult<()> {
        while limit.map_or(true, |n| self.cycles_completed < n) {
            if self.shutdown.is_triggered() {
                break;
            }

            let batch = self.walk.advance(Utc::now());
            self.persist_with_retry(&batch)?;
            self.cycles_completed += 1;
            log::info!(
                "cycle {}: inserted {} row(s)",
                self.cycles_completed,
                batch.len()
            );

            if limit == Some(self.cycles_completed) {
                break;
            }
            if self.shutdown.wait_timeout(self.interval) {
                break;
            }
        }
        log::info!("stopped after {} cycle(s)", self.cycles_completed);
        Ok(())
    }

    fn persist_with_retry(&mut self, batch: &[Sample]) -> StreamResult<()> {
        let mut backoff = self.retry.initial_backoff;
        let mut attempt = 1;
        loop {
            match self.store.insert_batch(batch) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.retry.max_attempts && !self.shutdown.is_triggered() => {
                    log::warn!(
                        "batch insert failed (attempt {attempt}/{}): {err}; retrying in {:?}",
                        self.retry.max_attempts,
                        backoff
                    );
                    if self.shutdown.wait_timeout(backoff) {
                        return Err(err);
                    }
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
