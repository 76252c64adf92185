//! Color mapping for the rendered bars.
//!
//! Bars are colored from their displacement and the elapsed tick count,
//! separately from the physics that moves them.
//!
//! # Usage
//!
//! ```ignore
//! Ripples::preset(Preset::Pulse)
//!     .with_colors(ColorScheme::Evolving {
//!         rate: 0.001,
//!         height_scale: 2000.0,
//!         saturation: 0.8,
//!         value: 0.8,
//!     })
//!     .run()?;
//! ```

use glam::Vec3;

/// How a bar's color is derived from `(height, tick)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScheme {
    /// Hue cycles with elapsed ticks and shifts further with displacement.
    ///
    /// `hue = (tick * rate) mod 1 + |height| / height_scale`, wrapped to `[0, 1)`.
    Evolving {
        /// Hue change per tick.
        rate: f32,
        /// Displacement that shifts the hue by one full turn.
        height_scale: f32,
        saturation: f32,
        value: f32,
    },

    /// One fixed RGB color (0.0-1.0) for every bar.
    Solid(Vec3),
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Solid(Vec3::ONE)
    }
}

impl ColorScheme {
    /// RGB color (0.0-1.0) for a bar of the given height at the given tick.
    pub fn color(&self, height: f64, tick: u64) -> Vec3 {
        match *self {
            ColorScheme::Evolving {
                rate,
                height_scale,
                saturation,
                value,
            } => {
                let evolution = (tick as f64 * rate as f64).rem_euclid(1.0);
                let shift = height.abs() / height_scale as f64;
                hsv_to_rgb((evolution + shift) as f32, saturation, value)
            }
            ColorScheme::Solid(color) => color,
        }
    }
}

/// Convert HSV (all components 0.0-1.0) to RGB. Hue wraps.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
