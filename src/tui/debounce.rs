//! Trailing-edge debounce for live recomputation.
//!
//! Every edit calls `touch`; the event loop calls `fire` on each tick and
//! recomputes only once no edit has arrived for the full delay.

use std::time::{Duration, Instant};

/// Quiet period before a burst of edits is recomputed.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_edit: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last_edit: None }
    }

    /// Record an edit at `now`, restarting the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// True exactly once per burst, when the quiet period has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.last_edit {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.last_edit = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    /// Time left until `fire` would succeed, if an edit is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_edit
            .map(|at| self.delay.saturating_sub(now.saturating_duration_since(at)))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn idle_debouncer_never_fires() {
        let mut d = Debouncer::default();
        assert!(!d.is_pending());
        assert!(!d.fire(Instant::now()));
        assert_eq!(d.remaining(Instant::now()), None);
    }

    #[test]
    fn fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.touch(t0);

        assert!(!d.fire(t0 + 299 * MS));
        assert_eq!(d.remaining(t0 + 100 * MS), Some(200 * MS));
        assert!(d.fire(t0 + 300 * MS));
        assert!(!d.fire(t0 + 400 * MS));
        assert!(!d.is_pending());
    }

    #[test]
    fn each_edit_restarts_the_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(300 * MS);
        d.touch(t0);
        d.touch(t0 + 200 * MS);
        d.touch(t0 + 400 * MS);

        assert!(!d.fire(t0 + 650 * MS));
        assert!(d.fire(t0 + 700 * MS));
    }
}
