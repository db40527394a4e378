//! Single-slot delayed-task scheduler
//!
//! Each `schedule` cancels any pending deadline before installing the new
//! one, so only the last request within the quiet window fires. The unit is
//! driven with explicit instants, which makes it testable by simulating time
//! advancement instead of sleeping.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Schedule the task to fire `quiet` after `now`, superseding any
    /// pending schedule.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Drop any pending schedule without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the quiet window has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn test_does_not_fire_before_quiet_window() {
        let mut d = Debouncer::new(QUIET);
        let t0 = Instant::now();
        d.schedule(t0);

        assert!(!d.fire(t0 + Duration::from_millis(299)));
        assert!(d.is_pending());
    }

    #[test]
    fn test_fires_once_after_quiet_window() {
        let mut d = Debouncer::new(QUIET);
        let t0 = Instant::now();
        d.schedule(t0);

        assert!(d.fire(t0 + QUIET));
        assert!(!d.is_pending());
        // one-shot: a second poll does not fire again
        assert!(!d.fire(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_reschedule_supersedes_earlier_deadline() {
        let mut d = Debouncer::new(QUIET);
        let t0 = Instant::now();
        d.schedule(t0);
        d.schedule(t0 + Duration::from_millis(200));

        // the first deadline has passed, but it was superseded
        assert!(!d.fire(t0 + Duration::from_millis(300)));
        // the second deadline fires
        assert!(d.fire(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_cancel_drops_pending_schedule() {
        let mut d = Debouncer::new(QUIET);
        let t0 = Instant::now();
        d.schedule(t0);
        d.cancel();

        assert!(!d.is_pending());
        assert!(!d.fire(t0 + Duration::from_secs(1)));
    }
}
