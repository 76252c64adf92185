//! Time facilities for the tick loop.
//!
//! [`Ticker`] decides when the next tick is due at a fixed target rate.
//! [`Time`] measures what actually happened: elapsed time, frame count, and
//! the achieved rate.
//!
//! # Example
//!
//! ```ignore
//! use ripples::time::{Ticker, Time};
//!
//! let mut ticker = Ticker::new(100, Instant::now());
//! let mut time = Time::new();
//!
//! // In your loop:
//! if ticker.poll(Instant::now()) {
//!     chain.tick();
//!     time.update();
//! }
//! println!("Rate: {:.1}/s", time.fps());
//! ```

use std::time::{Duration, Instant};

/// Fixed-rate deadline tracker.
///
/// Never fires more often than the target rate. When the loop falls more
/// than a period behind, the missed ticks are dropped rather than replayed
/// in a burst.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    deadline: Instant,
}

impl Ticker {
    /// Ticker for `rate` ticks per second whose first tick is due at `start`.
    ///
    /// A rate of zero is treated as one tick per second.
    pub fn new(rate: u32, start: Instant) -> Self {
        Self {
            period: Duration::from_secs(1) / rate.max(1),
            deadline: start,
        }
    }

    /// Returns `true` and schedules the next deadline if a tick is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        self.deadline += self.period;
        if self.deadline < now {
            self.deadline = now + self.period;
        }
        true
    }

    /// When the next tick is due.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Time tracking for the running loop.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated rate (updated periodically).
    fps: f32,
    /// Frame count at last rate update.
    fps_frame_count: u64,
    /// Time of last rate calculation.
    fps_update_time: Instant,
    /// How often to update the rate calculation.
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a time tracker with an explicit start instant.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame at the current instant.
    ///
    /// Returns `true` when the rate estimate was refreshed.
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// Record a frame at `now`.
    pub fn update_at(&mut self, now: Instant) -> bool {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Time since start at the last recorded frame.
    pub fn elapsed(&self) -> Duration {
        self.last_frame.saturating_duration_since(self.start)
    }

    /// Time between the last two frames in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Measured frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
