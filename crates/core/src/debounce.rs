use std::time::{Duration, Instant};

/// Trailing-edge debounce for bursty events (resize, rapid scroll).
///
/// Every [`poke`](Debounce::poke) pushes the deadline back by the full
/// window; [`fire`](Debounce::fire) reports true exactly once, after the
/// burst has been quiet for a whole window. Time is passed in, never
/// sampled, so behavior is fully testable.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record an event at `now`, re-arming the deadline.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True exactly once when the deadline has passed; disarms itself.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a deadline is pending. Useful for sizing poll timeouts.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    #[test]
    fn fires_once_after_quiet_window() {
        let mut d = Debounce::new(WINDOW);
        let t0 = Instant::now();
        d.poke(t0);
        assert!(!d.fire(t0 + Duration::from_millis(100)));
        assert!(d.fire(t0 + WINDOW));
        // Disarmed until the next poke.
        assert!(!d.fire(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn pokes_within_burst_postpone_firing() {
        let mut d = Debounce::new(WINDOW);
        let t0 = Instant::now();
        d.poke(t0);
        d.poke(t0 + Duration::from_millis(100));
        // Original deadline passed, but the second poke pushed it back.
        assert!(!d.fire(t0 + WINDOW));
        assert!(d.fire(t0 + Duration::from_millis(100) + WINDOW));
    }

    #[test]
    fn unpoked_never_fires() {
        let mut d = Debounce::new(WINDOW);
        assert!(d.deadline().is_none());
        assert!(!d.fire(Instant::now()));
    }
}
