//! One-second countdown used for puzzle trials and the rest screen.
//!
//! The timer is driven from outside: whoever owns the one-second ticker calls
//! [`CountdownTimer::tick`]. Each instance owns its own remaining count, so a
//! stale timer from an earlier trial can never touch a new one.

type TickFn = Box<dyn FnMut(u32) + Send>;
type ExpireFn = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    /// Not started, cancelled, or already expired.
    Idle,
    Running { remaining: u32 },
    /// This tick reached zero and `on_expire` ran.
    Expired,
}

#[derive(Default)]
pub struct CountdownTimer {
    remaining: u32,
    on_tick: Option<TickFn>,
    on_expire: Option<ExpireFn>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `seconds`, cancelling any running countdown.
    /// A zero-length countdown expires immediately without ticking.
    pub fn start<T, E>(&mut self, seconds: u32, on_tick: T, on_expire: E)
    where
        T: FnMut(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.cancel();
        if seconds == 0 {
            on_expire();
            return;
        }
        self.remaining = seconds;
        self.on_tick = Some(Box::new(on_tick));
        self.on_expire = Some(Box::new(on_expire));
    }

    /// Advance one second.
    pub fn tick(&mut self) -> TimerStatus {
        let Some(on_tick) = self.on_tick.as_mut() else {
            return TimerStatus::Idle;
        };

        self.remaining = self.remaining.saturating_sub(1);
        on_tick(self.remaining);

        if self.remaining > 0 {
            return TimerStatus::Running {
                remaining: self.remaining,
            };
        }

        self.on_tick = None;
        if let Some(on_expire) = self.on_expire.take() {
            on_expire();
        }
        TimerStatus::Expired
    }

    /// Stop without firing `on_expire`. No-op when already stopped.
    pub fn cancel(&mut self) {
        self.on_tick = None;
        self.on_expire = None;
        self.remaining = 0;
    }

    pub fn is_running(&self) -> bool {
        self.on_tick.is_some()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// `m:ss`, as shown on the clock above the board.
pub fn clock_label(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn recording_timer(seconds: u32) -> (CountdownTimer, Arc<Mutex<Vec<u32>>>, Arc<AtomicU32>) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let expired = Arc::new(AtomicU32::new(0));
        let mut timer = CountdownTimer::new();
        let (t, e) = (ticks.clone(), expired.clone());
        timer.start(
            seconds,
            move |left| t.lock().unwrap().push(left),
            move || {
                e.fetch_add(1, Ordering::SeqCst);
            },
        );
        (timer, ticks, expired)
    }

    #[test]
    fn test_three_second_countdown() {
        let (mut timer, ticks, expired) = recording_timer(3);

        assert_eq!(timer.tick(), TimerStatus::Running { remaining: 2 });
        assert_eq!(timer.tick(), TimerStatus::Running { remaining: 1 });
        assert_eq!(timer.tick(), TimerStatus::Expired);
        assert_eq!(timer.tick(), TimerStatus::Idle);
        assert_eq!(timer.tick(), TimerStatus::Idle);

        assert_eq!(*ticks.lock().unwrap(), vec![2, 1, 0]);
        assert_eq!(expired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_cancel_before_zero_prevents_expiry() {
        let (mut timer, ticks, expired) = recording_timer(3);
        timer.tick();
        timer.tick();
        timer.cancel();
        timer.cancel();

        assert_eq!(timer.tick(), TimerStatus::Idle);
        assert_eq!(*ticks.lock().unwrap(), vec![2, 1]);
        assert_eq!(expired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restart_replaces_previous_countdown() {
        let (mut timer, _, first_expired) = recording_timer(2);
        timer.tick();

        let second = Arc::new(AtomicU32::new(0));
        let s = second.clone();
        timer.start(1, |_| {}, move || {
            s.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(timer.tick(), TimerStatus::Expired);

        assert_eq!(first_expired.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_length_expires_immediately() {
        let (mut timer, ticks, expired) = recording_timer(0);
        assert_eq!(expired.load(Ordering::SeqCst), 1);
        assert!(ticks.lock().unwrap().is_empty());
        assert_eq!(timer.tick(), TimerStatus::Idle);
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(30), "0:30");
        assert_eq!(clock_label(5), "0:05");
        assert_eq!(clock_label(125), "2:05");
    }
}
