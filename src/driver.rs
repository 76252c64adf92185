//! Finite sinusoidal forcing injected at the right edge of a chain.

use std::f64::consts::TAU;

/// Startup parameters for a [`Driver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    /// Peak height of the pulse.
    pub amplitude: f64,
    /// Angular frequency in radians per tick.
    pub omega: f64,
}

impl DriverConfig {
    pub const fn new(amplitude: f64, omega: f64) -> Self {
        Self { amplitude, omega }
    }
}

/// A forcing source that runs for two full periods and then goes inert.
///
/// The adjacent column reads [`height`](Driver::height) exactly like a
/// neighbor's height. The driver never reads anything back.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    config: DriverConfig,
    counter: u64,
    height: f64,
    bound: u64,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        // A non-positive omega saturates to 0 (never active) or u64::MAX.
        let bound = (2.0 * TAU / config.omega).floor() as u64;
        Self {
            config,
            counter: 0,
            height: 0.0,
            bound,
        }
    }

    /// Advance one tick. A no-op once two periods have elapsed.
    pub fn step(&mut self) {
        if self.counter < self.bound {
            self.height = self.config.amplitude * (self.config.omega * self.counter as f64).sin();
            self.counter += 1;
        }
    }

    /// Current forcing value.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Steps taken so far. Frozen once the driver is inert.
    #[inline]
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Number of steps the driver stays active for.
    #[inline]
    pub fn bound(&self) -> u64 {
        self.bound
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.counter < self.bound
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}
