//! Cooperative cancellation for event dispatch.
//!
//! A [`StopSignal`] combines a manually raised flag with an optional
//! wall-clock deadline and an optional budget of checks. Dispatch checks it
//! once per outer iteration and returns whatever state has accumulated when
//! it trips.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Shared stop flag plus optional deadline.
///
/// Cloning is cheap and every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    /// Whether a stop has been requested.
    stop_requested: Arc<AtomicBool>,

    /// Instant after which dispatch should stop on its own.
    deadline: Option<Instant>,

    /// Checks that may still pass before the signal trips. Shared by clones.
    remaining_checks: Option<Arc<AtomicUsize>>,
}

impl StopSignal {
    /// A signal that never trips unless [`request_stop`](Self::request_stop)
    /// is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that also trips once `limit` has elapsed from now.
    pub fn with_deadline(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
            ..Self::default()
        }
    }

    /// A signal that lets `limit` checks pass and trips on every check after.
    ///
    /// Sequential dispatch checks once per event and parallel dispatch once
    /// per competitor, so this bounds how much of a run is applied.
    pub fn after_checks(limit: usize) -> Self {
        Self {
            remaining_checks: Some(Arc::new(AtomicUsize::new(limit))),
            ..Self::default()
        }
    }

    /// Request a stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested or the deadline has passed.
    pub fn should_stop(&self) -> bool {
        if self.stop_requested.load(Ordering::Acquire) {
            return true;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return true;
        }
        self.remaining_checks.as_ref().is_some_and(|remaining| {
            remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| left.checked_sub(1))
                .is_err()
        })
    }
}
