//! Physics coefficients and the fixed startup presets.
//!
//! All constants are set once at startup. There is no runtime configuration:
//! a binary picks a [`Preset`] and optionally adjusts it through the
//! [`Ripples`](crate::Ripples) builder before calling `run`.

use glam::Vec3;

use crate::chain::InitialCondition;
use crate::driver::DriverConfig;
use crate::visuals::ColorScheme;

/// Per-column spring, friction, and coupling constants.
///
/// All three are expected to be non-negative. Nothing is clamped: a badly
/// tuned set simply lets the bars grow without bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Restoring (spring) coefficient pulling a column back to rest.
    pub k: f64,
    /// Velocity damping coefficient.
    pub dashpot: f64,
    /// Elastic coupling stiffness between adjacent columns.
    pub neighbor_k: f64,
}

impl Coefficients {
    /// Create a coefficient set.
    pub const fn new(k: f64, dashpot: f64, neighbor_k: f64) -> Self {
        Self { k, dashpot, neighbor_k }
    }

    /// All forces disabled: columns coast at constant velocity.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
}

impl Default for Coefficients {
    fn default() -> Self {
        Preset::Pulse.coefficients()
    }
}

/// The two built-in parameterizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Wide undamped columns at rest, excited by a two-period sinusoidal
    /// pulse at the right edge. Colors drift slowly with time.
    #[default]
    Pulse,
    /// Narrow, lightly damped columns starting from random heights with no
    /// driver. Drawn in a single solid color.
    Plane,
}

pub(crate) const WINDOW_WIDTH: u32 = 1920;
pub(crate) const WINDOW_HEIGHT: u32 = 1080;
pub(crate) const TICK_RATE: u32 = 100;

const PULSE_COLUMN_WIDTH: u32 = 50;
const PULSE_MAX_HEIGHT: f64 = 400.0;
const PULSE_OMEGA: f64 = 0.0005;
const PULSE_COLOR_EVOLUTION: f32 = 0.001;

const PLANE_COLUMN_WIDTH: u32 = 12;
const PLANE_SCATTER: i32 = 200;

impl Preset {
    /// Window title used by the windowed runner.
    pub fn title(&self) -> &'static str {
        match self {
            Preset::Pulse => "ripples",
            Preset::Plane => "rippleplane",
        }
    }

    /// Bar width in pixels.
    pub fn column_width(&self) -> u32 {
        match self {
            Preset::Pulse => PULSE_COLUMN_WIDTH,
            Preset::Plane => PLANE_COLUMN_WIDTH,
        }
    }

    pub fn coefficients(&self) -> Coefficients {
        match self {
            Preset::Pulse => Coefficients::new(0.0, 0.0, 0.002),
            Preset::Plane => Coefficients::new(0.0001, 0.0001, 0.00001),
        }
    }

    pub fn driver(&self) -> Option<DriverConfig> {
        match self {
            Preset::Pulse => Some(DriverConfig::new(PULSE_MAX_HEIGHT, PULSE_OMEGA)),
            Preset::Plane => None,
        }
    }

    pub fn initial(&self) -> InitialCondition {
        match self {
            Preset::Pulse => InitialCondition::Rest,
            Preset::Plane => InitialCondition::Scattered {
                min: -PLANE_SCATTER,
                max: PLANE_SCATTER,
                seed: None,
            },
        }
    }

    pub fn colors(&self) -> ColorScheme {
        match self {
            Preset::Pulse => ColorScheme::Evolving {
                rate: PULSE_COLOR_EVOLUTION,
                height_scale: PULSE_MAX_HEIGHT as f32 * 5.0,
                saturation: 0.8,
                value: 0.8,
            },
            Preset::Plane => ColorScheme::Solid(Vec3::new(155.0, 0.0, 255.0) / 255.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_preset() {
        let preset = Preset::Pulse;
        assert_eq!(WINDOW_WIDTH / preset.column_width(), 38);
        assert_eq!(preset.coefficients(), Coefficients::new(0.0, 0.0, 0.002));
        assert!(preset.driver().is_some());
        assert_eq!(preset.initial(), InitialCondition::Rest);
    }

    #[test]
    fn test_plane_preset() {
        let preset = Preset::Plane;
        assert_eq!(WINDOW_WIDTH / preset.column_width(), 160);
        assert!(preset.driver().is_none());
        match preset.initial() {
            InitialCondition::Scattered { min, max, .. } => {
                assert_eq!((min, max), (-200, 200));
            }
            other => panic!("expected scattered start, got {:?}", other),
        }
        assert!(matches!(preset.colors(), ColorScheme::Solid(_)));
    }

    #[test]
    fn test_default_coefficients_are_pulse() {
        assert_eq!(Coefficients::default(), Preset::Pulse.coefficients());
    }
}
