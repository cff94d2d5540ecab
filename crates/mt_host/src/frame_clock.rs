use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly.
///
/// Clones share the same timeline, so a test can hand one clone to the loop and advance another
/// to simulate slow work.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Fixed-cadence pacer.
///
/// Ticks are scheduled on a deadline grid `frame_duration` apart. A tick that finishes early
/// sleeps until the next deadline; an overrun returns immediately and re-anchors the grid at the
/// current time, so missed ticks are dropped rather than replayed in a burst.
#[derive(Debug)]
pub struct FrameClock<C: Clock = SystemClock> {
    clock: C,
    frame_duration: Duration,
    last_deadline: Option<Duration>,
}

impl FrameClock<SystemClock> {
    pub fn new(frame_duration: Duration) -> Self {
        Self::with_clock(frame_duration, SystemClock::new())
    }
}

impl<C: Clock> FrameClock<C> {
    pub fn with_clock(frame_duration: Duration, clock: C) -> Self {
        Self {
            clock,
            frame_duration: frame_duration.max(Duration::from_nanos(1)),
            last_deadline: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Forget the previous tick; the next wait returns immediately.
    pub fn reset(&mut self) {
        self.last_deadline = None;
    }

    /// Wait for the next deadline. Returns the number of deadlines skipped because the previous
    /// tick overran.
    pub fn wait_for_next_tick(&mut self) -> u32 {
        let now = self.clock.now();
        let Some(last) = self.last_deadline else {
            self.last_deadline = Some(now);
            return 0;
        };

        let next = last + self.frame_duration;
        if now < next {
            self.clock.sleep(next - now);
            self.last_deadline = Some(next);
            return 0;
        }

        let late = now - next;
        let missed =
            u32::try_from(late.as_nanos() / self.frame_duration.as_nanos()).unwrap_or(u32::MAX);
        if missed > 0 {
            log::debug!("frame overran by {late:?}, dropping {missed} tick(s)");
        }
        self.last_deadline = Some(now);
        missed
    }
}
