use std::time::{Duration, Instant};

/// Fixed-interval tick clock owned by the driver loop.
///
/// The game core never keeps time itself; the driver asks this clock whether a
/// tick is due and stops it once the game is over.
#[derive(Debug, Clone, Copy)]
pub struct TickTimer {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl TickTimer {
    /// Creates a stopped timer.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    /// Starts the clock; the first tick falls due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    pub fn stop(&mut self) {
        self.last_tick = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Returns true when the timer runs and a full interval has passed since the last tick.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_tick
            .is_some_and(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Records a tick taken at `now`; ignored while stopped.
    pub fn mark(&mut self, now: Instant) {
        if self.last_tick.is_some() {
            self.last_tick = Some(now);
        }
    }

    /// Time left until the next tick, or `None` while stopped.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_tick?;
        Some(self.interval.saturating_sub(now.saturating_duration_since(last)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::TickTimer;

    #[test]
    fn stopped_timer_is_never_due() {
        let timer = TickTimer::new(Duration::from_millis(400));
        let now = Instant::now();

        assert!(!timer.is_running());
        assert!(!timer.is_due(now + Duration::from_secs(10)));
        assert_eq!(timer.remaining(now), None);
    }

    #[test]
    fn tick_falls_due_after_one_interval() {
        let mut timer = TickTimer::new(Duration::from_millis(400));
        let start = Instant::now();
        timer.start(start);

        assert!(!timer.is_due(start + Duration::from_millis(399)));
        assert!(timer.is_due(start + Duration::from_millis(400)));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(100)),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn mark_restarts_the_interval() {
        let mut timer = TickTimer::new(Duration::from_millis(400));
        let start = Instant::now();
        timer.start(start);

        let first_tick = start + Duration::from_millis(410);
        timer.mark(first_tick);

        assert!(!timer.is_due(first_tick + Duration::from_millis(200)));
        assert!(timer.is_due(first_tick + Duration::from_millis(400)));
    }

    #[test]
    fn stop_disables_further_ticks() {
        let mut timer = TickTimer::new(Duration::from_millis(400));
        let start = Instant::now();
        timer.start(start);
        timer.stop();
        timer.mark(start);

        assert!(!timer.is_running());
        assert!(!timer.is_due(start + Duration::from_secs(1)));
    }
}
