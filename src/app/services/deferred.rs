use std::time::{Duration, Instant};

/// Single-slot deferred task driven by explicit timestamps.
///
/// Scheduling always replaces the previous deadline, so a burst of
/// `schedule` calls fires once, `delay` after the last call (trailing edge).
/// The owner polls with `fire_if_due`; nothing runs by itself.
#[derive(Debug, Clone)]
pub struct DeferredTask {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DeferredTask {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the task to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return `true` when the deadline has been reached.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
