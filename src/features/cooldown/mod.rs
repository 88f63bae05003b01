//! # Feature: Cooldown Gate
//!
//! Process-wide admission control for debate runs: at most one run in flight,
//! and a minimum interval between the starts of consecutive runs. Admission
//! hands out a `RunPermit` that releases the exclusion flag when dropped, so
//! every exit path of a run (completion, timeout, error, panic unwind) frees it.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Single global gate with mutual exclusion and RAII permits
//! - 1.0.0: Initial release with per-user sliding window rate limiting

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct CooldownState {
    last_run: Option<Instant>,
    held: bool,
}

/// Outcome of an admission attempt
#[derive(Debug)]
pub enum Admission {
    Admitted(RunPermit),
    /// A run is currently held
    Busy,
    /// Time left until the window reopens
    OnCooldown(Duration),
}

#[derive(Debug, Clone)]
pub struct CooldownGate {
    state: Arc<Mutex<CooldownState>>,
    window: Duration,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        CooldownGate {
            state: Arc::new(Mutex::new(CooldownState::default())),
            window,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CooldownState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Try to start a run at `now`
    ///
    /// The exclusion check comes first and ignores the timestamp. On success
    /// the run timestamp is recorded immediately, so a run that outlasts the
    /// window still throttles the next one.
    pub fn try_admit(&self, now: Instant) -> Admission {
        let mut state = self.lock();

        if state.held {
            return Admission::Busy;
        }

        let remaining = Self::remaining_from(&state, self.window, now);
        if !remaining.is_zero() {
            return Admission::OnCooldown(remaining);
        }

        state.held = true;
        state.last_run = Some(now);
        Admission::Admitted(RunPermit {
            state: Arc::clone(&self.state),
        })
    }

    /// Time until the next run may start, zero at or after the window edge
    pub fn remaining(&self, now: Instant) -> Duration {
        Self::remaining_from(&self.lock(), self.window, now)
    }

    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn remaining_from(state: &CooldownState, window: Duration, now: Instant) -> Duration {
        match state.last_run {
            Some(last) => window.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

/// Exclusive right to run a debate; releases the gate on drop
#[derive(Debug)]
pub struct RunPermit {
    state: Arc<Mutex<CooldownState>>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.held = false;
    }
}
