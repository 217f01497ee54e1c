use std::time::{Duration, Instant};

/// Host-side schedule for the 1 Hz session tick. At most one deadline exists:
/// arming again replaces it, so a restarted challenge never has two timers
/// decrementing it.
#[derive(Clone, Debug)]
pub struct Countdown {
    interval: Duration,
    next_at: Option<Instant>,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_at: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_at = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_at.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of whole intervals elapsed since the last call. The deadline
    /// advances by that many intervals so no time is lost between polls.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_at else {
            return 0;
        };
        let mut count = 0;
        while now >= next {
            count += 1;
            next += self.interval;
        }
        self.next_at = Some(next);
        count
    }
}
