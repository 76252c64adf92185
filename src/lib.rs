//! # Ripples
//!
//! A row of columns, each a damped spring-mass oscillator coupled to its
//! left and right neighbors, rendered in real time as colored vertical bars.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ripples::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Ripples::preset(Preset::Pulse).run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Columns
//!
//! Each [`Oscillator`] holds a height and a velocity. Its acceleration is
//!
//! ```text
//! -(height·K + velocity·DASHPOT + NEIGHBOR_K·(height - right) + NEIGHBOR_K·(height - left))
//! ```
//!
//! where a missing neighbor contributes nothing. The constants live in
//! [`Coefficients`].
//!
//! ### The chain
//!
//! [`ColumnChain`] owns every column and wires neighbors by index. Each
//! [`tick`](ColumnChain::tick) advances all columns by one step from a shared
//! snapshot ([`UpdateOrder::Simultaneous`]), or one by one in place
//! ([`UpdateOrder::Sequential`]).
//!
//! ### The driver
//!
//! An optional [`Driver`] sits to the right of the last column and feeds a
//! sinusoidal pulse into it for two full periods, then holds still. It
//! steps once per tick, or once per column under
//! [`UpdateOrder::Sequential`].
//!
//! ## Running without a window
//!
//! ```ignore
//! let ripples = Ripples::preset(Preset::Plane);
//! let mut canvas = Canvas::new(*ripples.layout(), *ripples.colors());
//! ripples.run_headless(&mut canvas, &mut SteppedPacer::new(), Some(600))?;
//! ```

mod canvas;
mod chain;
mod driver;
mod error;
mod gpu;
mod oscillator;
mod params;
pub mod render;
pub mod schedule;
mod simulation;
pub mod time;
pub mod visuals;

pub use canvas::Canvas;
pub use chain::{ColumnChain, Frame, InitialCondition, Integrator, UpdateOrder};
pub use driver::{Driver, DriverConfig};
pub use error::{ConfigError, GpuError, SimulationError};
pub use glam::Vec3;
pub use oscillator::{Neighbor, Oscillator};
pub use params::{Coefficients, Preset};
pub use render::{Bar, Layout, Renderer};
pub use schedule::{Pacer, Scheduler, SleepPacer, SteppedPacer, StopToken};
pub use simulation::Ripples;
pub use visuals::ColorScheme;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use ripples::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::chain::{ColumnChain, Frame, InitialCondition, Integrator, UpdateOrder};
    pub use crate::driver::{Driver, DriverConfig};
    pub use crate::error::SimulationError;
    pub use crate::oscillator::Oscillator;
    pub use crate::params::{Coefficients, Preset};
    pub use crate::render::{Layout, Renderer};
    pub use crate::schedule::{SleepPacer, SteppedPacer, StopToken};
    pub use crate::simulation::Ripples;
    pub use crate::visuals::ColorScheme;
    pub use crate::Vec3;
}
