//! Headless fixed-rate loop with swappable pacing and cancellation.
//!
//! The windowed runner paces through the winit event loop instead; this
//! module drives a [`ColumnChain`] and any [`Renderer`] without a display,
//! which is what tests and benchmarks use.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::chain::ColumnChain;
use crate::render::Renderer;
use crate::time::Ticker;

/// Shared flag that asks a running loop to stop after its current tick.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Source of time and the way the loop waits for a deadline.
pub trait Pacer {
    fn now(&self) -> Instant;
    fn wait_until(&mut self, deadline: Instant);
}

/// Wall-clock pacing with a blocking sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wait_until(&mut self, deadline: Instant) {
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Virtual clock that jumps straight to each deadline.
///
/// Deterministic and instant, for tests.
#[derive(Debug, Clone)]
pub struct SteppedPacer {
    start: Instant,
    now: Instant,
    waits: u64,
}

impl SteppedPacer {
    pub fn new() -> Self {
        let start = Instant::now();
        Self {
            start,
            now: start,
            waits: 0,
        }
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }

    /// Number of times the loop had to wait.
    pub fn waits(&self) -> u64 {
        self.waits
    }
}

impl Default for SteppedPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for SteppedPacer {
    fn now(&self) -> Instant {
        self.now
    }

    fn wait_until(&mut self, deadline: Instant) {
        if deadline > self.now {
            self.now = deadline;
        }
        self.waits += 1;
    }
}

/// Fixed-rate `tick → draw` loop.
#[derive(Debug, Clone)]
pub struct Scheduler {
    rate: u32,
    limit: Option<u64>,
    stop: StopToken,
}

impl Scheduler {
    /// Loop at `rate` ticks per second until stopped.
    pub fn new(rate: u32) -> Self {
        Self {
            rate,
            limit: None,
            stop: StopToken::new(),
        }
    }

    /// Stop on its own after `ticks` ticks.
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    /// Handle for stopping the loop from a renderer or another owner.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Run until stopped or the limit is reached. Returns the ticks run.
    pub fn run<R, P>(&self, chain: &mut ColumnChain, renderer: &mut R, pacer: &mut P) -> u64
    where
        R: Renderer + ?Sized,
        P: Pacer + ?Sized,
    {
        let mut ticker = Ticker::new(self.rate, pacer.now());
        let mut ticks = 0;

        while !self.stop.is_stopped() && self.limit.map_or(true, |limit| ticks < limit) {
            if !ticker.poll(pacer.now()) {
                pacer.wait_until(ticker.deadline());
                continue;
            }
            chain.tick();
            renderer.draw(&chain.frame());
            ticks += 1;
        }

        log::debug!("scheduler stopped after {} ticks", ticks);
        ticks
    }
}
