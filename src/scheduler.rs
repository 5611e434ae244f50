use std::time::{Duration, Instant};

use crate::config::{INITIAL_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS, TICK_INTERVAL_STEP_MS};

/// Returns the interval that follows `previous` after one fruit.
#[must_use]
pub fn next_interval(previous: Duration) -> Duration {
    previous
        .saturating_sub(Duration::from_millis(TICK_INTERVAL_STEP_MS))
        .max(Duration::from_millis(MIN_TICK_INTERVAL_MS))
}

/// Returns the interval after `consumed` fruits: `max(50, 150 - 10n)` ms.
#[must_use]
pub fn interval_after(consumed: u32) -> Duration {
    let penalty_ms = u64::from(consumed) * TICK_INTERVAL_STEP_MS;
    Duration::from_millis(
        INITIAL_TICK_INTERVAL_MS
            .saturating_sub(penalty_ms)
            .max(MIN_TICK_INTERVAL_MS),
    )
}

/// One firing of an armed timer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Tick {
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    generation: u64,
    interval: Duration,
    next_due: Instant,
}

/// Holds at most one repeating timer.
///
/// Arming always retires the previous occupant first, so two timers can never
/// be live at once and a replaced timer never fires again.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    armed: Option<ArmedTimer>,
    generation: u64,
}

impl TimerSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a repeating timer whose first tick is due `interval` after
    /// `now`. Returns the new generation.
    pub fn arm(&mut self, interval: Duration, now: Instant) -> u64 {
        self.cancel();
        self.generation += 1;
        self.armed = Some(ArmedTimer {
            generation: self.generation,
            interval,
            next_due: now + interval,
        });
        self.generation
    }

    /// Drops the current timer. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Generation of the live timer, if any.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.armed.map(|timer| timer.generation)
    }

    /// Fires at most once per call. A late poll does not replay missed ticks.
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        let timer = self.armed.as_mut()?;
        if now < timer.next_due {
            return None;
        }

        timer.next_due += timer.interval;
        if timer.next_due <= now {
            timer.next_due = now + timer.interval;
        }

        Some(Tick {
            generation: timer.generation,
        })
    }

    /// Time left until the next tick, zero when overdue.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.armed
            .map(|timer| timer.next_due.saturating_duration_since(now))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Drives a round's ticks: `Idle -> Running -> Idle`.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    slot: TimerSlot,
    interval: Duration,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            slot: TimerSlot::new(),
            interval: interval_after(0),
        }
    }

    /// Arms the repeating timer and enters `Running`.
    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.slot.arm(interval, now);
        self.state = SchedulerState::Running;
    }

    /// Swaps the running timer for one at `interval`. Ignored while idle.
    pub fn rearm(&mut self, interval: Duration, now: Instant) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }

        self.interval = interval;
        self.slot.arm(interval, now);
        true
    }

    /// Cancels the timer and returns to `Idle`.
    pub fn stop(&mut self) {
        self.slot.cancel();
        self.state = SchedulerState::Idle;
    }

    /// Returns true when a tick is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.state == SchedulerState::Running && self.slot.poll(now).is_some()
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.slot.time_until_due(now)
    }

    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.slot.generation()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{Scheduler, SchedulerState, TimerSlot, interval_after, next_interval};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn interval_sequence_is_non_increasing_and_floored() {
        let mut previous = interval_after(0);
        assert_eq!(previous, ms(150));

        for n in 1..30 {
            let current = interval_after(n);
            assert!(current <= previous);
            assert!(current >= ms(50));
            assert_eq!(current, ms(150u64.saturating_sub(10 * u64::from(n)).max(50)));
            assert_eq!(next_interval(previous), current);
            previous = current;
        }

        assert_eq!(interval_after(10), ms(50));
        assert_eq!(next_interval(ms(50)), ms(50));
    }

    #[test]
    fn timer_fires_after_its_interval() {
        let start = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(ms(150), start);

        assert!(slot.poll(start + ms(149)).is_none());
        assert!(slot.poll(start + ms(150)).is_some());
        assert!(slot.poll(start + ms(151)).is_none());
        assert!(slot.poll(start + ms(300)).is_some());
    }

    #[test]
    fn rearming_retires_the_previous_timer() {
        let start = Instant::now();
        let mut slot = TimerSlot::new();
        let first = slot.arm(ms(150), start);
        let second = slot.arm(ms(140), start + ms(100));

        assert_ne!(first, second);
        assert_eq!(slot.generation(), Some(second));
        // The first timer would have fired at 150 ms.
        assert!(slot.poll(start + ms(150)).is_none());

        let tick = slot.poll(start + ms(240)).expect("second timer is due");
        assert_eq!(tick.generation, second);
    }

    #[test]
    fn late_poll_fires_once() {
        let start = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(ms(50), start);

        let late = start + ms(1_000);
        assert!(slot.poll(late).is_some());
        assert!(slot.poll(late).is_none());
        assert_eq!(slot.time_until_due(late), Some(ms(50)));
    }

    #[test]
    fn stopped_scheduler_never_ticks() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.start(ms(150), start);
        assert_eq!(scheduler.state(), SchedulerState::Running);

        scheduler.stop();

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!scheduler.poll(start + ms(10_000)));
        assert!(!scheduler.rearm(ms(140), start));
        assert_eq!(scheduler.generation(), None);
    }

    #[test]
    fn rearm_updates_interval_while_running() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.start(ms(150), start);

        assert!(scheduler.rearm(ms(140), start + ms(20)));
        assert_eq!(scheduler.interval(), ms(140));
        assert!(!scheduler.poll(start + ms(150)));
        assert!(scheduler.poll(start + ms(160)));
    }
}
