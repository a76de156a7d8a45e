//! Time source abstraction.
//!
//! Everything in this crate that needs "now" asks a [`Clock`] for it instead
//! of reading the system time directly. Production code wires in
//! [`SystemClock`] or a live [`SharedClock`]; tests bind a [`FixedClock`] or
//! freeze a [`SharedClock`] for the duration of a scope.
//!
//! # Freezing
//!
//! [`SharedClock::freeze_at`] and [`SharedClock::freeze`] install an override
//! and hand back a [`FreezeGuard`]. The override is released when the guard
//! is dropped, which also happens while unwinding from a panic. Overrides
//! stack: the innermost live guard decides what `now()` returns, and
//! releasing it restores whatever was active before.
//!
//! Freezing is a test seam. It is only compiled for this crate's own tests
//! or when the `test-seams` feature is enabled.

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// An absolute point in time. Calendar fields are only ever read after
/// converting into a time zone (see [`crate::calendar`]).
pub type Instant = DateTime<Utc>;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant according to this clock.
    fn now(&self) -> Instant;

    /// Identifier for log output.
    fn name(&self) -> &str {
        "Clock"
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ── SystemClock ─────────────────────────────────────────────────────────────

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

// ── FixedClock ──────────────────────────────────────────────────────────────

/// A clock pinned to one instant, moved only by explicit calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: Instant,
}

impl FixedClock {
    pub fn new(now: Instant) -> Self {
        Self { now }
    }

    /// Move the clock by `step` (negative steps move it backwards).
    pub fn advance(&mut self, step: Duration) {
        self.now += step;
    }

    pub fn set(&mut self, now: Instant) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.now
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}

// ── SharedClock ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Override {
    id: u64,
    instant: Instant,
}

#[derive(Debug, Default)]
struct ClockState {
    overrides: RwLock<Vec<Override>>,
    #[cfg_attr(not(any(test, feature = "test-seams")), allow(dead_code))]
    next_id: AtomicU64,
}

/// A live clock that every clone observes identically, and that tests can
/// freeze through a scoped [`FreezeGuard`].
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    state: Arc<ClockState>,
}

impl SharedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any freeze override is currently installed.
    pub fn is_frozen(&self) -> bool {
        !self
            .state
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Clock for SharedClock {
    fn now(&self) -> Instant {
        let overrides = self
            .state
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match overrides.last() {
            Some(active) => active.instant,
            None => Utc::now(),
        }
    }

    fn name(&self) -> &str {
        "SharedClock"
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl SharedClock {
    /// Freeze `now()` at `instant` until the returned guard is dropped.
    pub fn freeze_at(&self, instant: Instant) -> FreezeGuard {
        let id = self
            .state
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let depth = {
            let mut overrides = self
                .state
                .overrides
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            overrides.push(Override { id, instant });
            overrides.len()
        };
        tracing::debug!(%instant, depth, "clock frozen");
        FreezeGuard {
            state: Arc::clone(&self.state),
            id,
            instant,
        }
    }

    /// Freeze `now()` at the real wall-clock time of this call.
    pub fn freeze(&self) -> FreezeGuard {
        self.freeze_at(Utc::now())
    }
}

/// Holds a [`SharedClock`] override; dropping it thaws the clock.
#[cfg(any(test, feature = "test-seams"))]
#[must_use = "the clock thaws as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FreezeGuard {
    state: Arc<ClockState>,
    id: u64,
    instant: Instant,
}

#[cfg(any(test, feature = "test-seams"))]
impl FreezeGuard {
    /// The instant this guard pinned the clock to.
    pub fn instant(&self) -> Instant {
        self.instant
    }

    /// Run `f` with the clock frozen, then thaw it, whether `f` returns or
    /// panics.
    pub fn thaw_after<R>(self, f: impl FnOnce() -> R) -> R {
        let result = f();
        drop(self);
        result
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Drop for FreezeGuard {
    fn drop(&mut self) {
        let remaining = {
            let mut overrides = self
                .state
                .overrides
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            overrides.retain(|o| o.id != self.id);
            overrides.len()
        };
        tracing::debug!(instant = %self.instant, remaining, "clock thawed");
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
