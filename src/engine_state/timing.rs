//! Fixed-step simulation clock.
//!
//! Wall time accumulates between frames and drains in whole ticks of 1/20 s. What is
//! left over, as a fraction of a tick, is the interpolant rendering uses between the
//! previous and current simulation state.

use web_time::{Duration, Instant};

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 20;

/// Length of one simulation tick.
pub const TICK_DURATION: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND as u64);

/// Accumulates frame time and hands it out in fixed ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    accumulator: Duration,
    last_frame: Option<Instant>,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock {
    /// Creates a clock with nothing accumulated.
    pub fn new() -> Self {
        TickClock {
            accumulator: Duration::ZERO,
            last_frame: None,
        }
    }

    /// Adds `elapsed` and returns how many whole ticks are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION {
            self.accumulator -= TICK_DURATION;
            ticks += 1;
        }
        ticks
    }

    /// Measures wall time since the previous call and advances by it.
    ///
    /// The first call only starts the clock.
    pub fn advance_to_now(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.advance(elapsed)
    }

    /// Fraction of a tick accumulated but not yet simulated, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / TICK_DURATION.as_secs_f32()
    }
}
