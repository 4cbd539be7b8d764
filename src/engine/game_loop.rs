/// Fixed timestep clock for the per-tick player update
///
/// Frame time is accumulated and released in fixed steps, so avatars move
/// the same distance for the same input no matter how fast frames arrive.
use std::time::{Duration, Instant};

/// Simulation step length in seconds (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Maximum ticks released by a single frame
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Accumulates wall-clock time into fixed simulation ticks
pub struct FrameClock {
    accumulator: Duration,
    last_frame: Instant,
    paused: bool,
    tick_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame: Instant::now(),
            paused: false,
            tick_count: 0,
        }
    }

    /// Measure the time since the previous frame and return the number of
    /// ticks to simulate
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Feed `elapsed` frame time and return the number of ticks to simulate
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop the backlog rather than replaying it next frame
        if ticks == MAX_STEPS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    /// Length of one tick in seconds
    pub fn timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame = Instant::now();
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
