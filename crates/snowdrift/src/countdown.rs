//! Minute/second countdown that fires once when it runs out.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Something the countdown did during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// The displayed time changed.
    Tick,
    /// The countdown ran out and stopped.
    Finished,
}

/// A stoppable `MM:SS` countdown.
///
/// Like a kitchen timer, the display reaches `00:00` one second before the
/// countdown reports [`CountdownEvent::Finished`].
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    minutes: u32,
    seconds: u32,
    /// When the next decrement is due, while running.
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(99),
            seconds: seconds.min(59),
            next_tick: None,
        }
    }

    /// Remaining `(minutes, seconds)`.
    pub fn remaining(&self) -> (u32, u32) {
        (self.minutes, self.seconds)
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// Start counting. Ignored when already running or at `00:00`.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() || self.is_zero() {
            return false;
        }
        self.next_tick = Some(now + TICK);
        true
    }

    /// Pause, keeping the remaining time.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Add `delta` minutes, clamped to 0..=99. Only while stopped.
    pub fn adjust_minutes(&mut self, delta: i32) {
        if !self.is_running() {
            self.minutes = (self.minutes as i32 + delta).clamp(0, 99) as u32;
        }
    }

    /// Add `delta` seconds, clamped to 0..=59. Only while stopped.
    pub fn adjust_seconds(&mut self, delta: i32) {
        if !self.is_running() {
            self.seconds = (self.seconds as i32 + delta).clamp(0, 59) as u32;
        }
    }

    /// Apply every decrement due by `now`.
    pub fn update(&mut self, now: Instant) -> Option<CountdownEvent> {
        let mut event = None;

        while let Some(due) = self.next_tick {
            if now < due {
                break;
            }
            if self.seconds > 0 {
                self.seconds -= 1;
            } else if self.minutes > 0 {
                self.minutes -= 1;
                self.seconds = 59;
            } else {
                self.next_tick = None;
                return Some(CountdownEvent::Finished);
            }
            self.next_tick = Some(due + TICK);
            event = Some(CountdownEvent::Tick);
        }

        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Countdown::new(150, 75).remaining(), (99, 59));
    }

    #[test]
    fn test_start_ignored_at_zero_or_running() {
        let now = Instant::now();
        let mut c = Countdown::new(0, 0);
        assert!(!c.start(now));

        let mut c = Countdown::new(0, 5);
        assert!(c.start(now));
        assert!(!c.start(now));
    }

    #[test]
    fn test_ticks_once_per_second() {
        let t0 = Instant::now();
        let mut c = Countdown::new(0, 5);
        c.start(t0);

        assert_eq!(c.update(t0 + Duration::from_millis(999)), None);
        assert_eq!(c.update(t0 + secs(1)), Some(CountdownEvent::Tick));
        assert_eq!(c.remaining(), (0, 4));
        assert_eq!(c.update(t0 + Duration::from_millis(1500)), None);
    }

    #[test]
    fn test_minute_rollover() {
        let t0 = Instant::now();
        let mut c = Countdown::new(1, 0);
        c.start(t0);
        c.update(t0 + secs(1));
        assert_eq!(c.remaining(), (0, 59));
    }

    #[test]
    fn test_catches_up_after_stall() {
        let t0 = Instant::now();
        let mut c = Countdown::new(0, 10);
        c.start(t0);
        assert_eq!(c.update(t0 + secs(3)), Some(CountdownEvent::Tick));
        assert_eq!(c.remaining(), (0, 7));
    }

    #[test]
    fn test_finishes_after_showing_zero() {
        let t0 = Instant::now();
        let mut c = Countdown::new(0, 2);
        c.start(t0);

        assert_eq!(c.update(t0 + secs(2)), Some(CountdownEvent::Tick));
        assert!(c.is_zero());
        assert!(c.is_running());
        assert_eq!(c.update(t0 + secs(3)), Some(CountdownEvent::Finished));
        assert!(!c.is_running());
        assert_eq!(c.update(t0 + secs(10)), None);
    }

    #[test]
    fn test_stop_keeps_remaining() {
        let t0 = Instant::now();
        let mut c = Countdown::new(0, 30);
        c.start(t0);
        c.update(t0 + secs(4));
        c.stop();
        assert_eq!(c.update(t0 + secs(20)), None);
        assert_eq!(c.remaining(), (0, 26));
    }

    #[test]
    fn test_adjust_only_while_stopped() {
        let mut c = Countdown::new(0, 58);
        c.adjust_seconds(5);
        c.adjust_minutes(-3);
        assert_eq!(c.remaining(), (0, 59));

        c.start(Instant::now());
        c.adjust_minutes(2);
        assert_eq!(c.remaining(), (0, 59));
    }
}
