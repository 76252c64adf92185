//! Bar layout shared by every renderer.
//!
//! A frame becomes one [`Bar`] per column: `column_width` pixels wide,
//! horizontally centered on `index * column_width`, and extending from the
//! vertical center of the window by the column's height. Positive heights
//! extend downward in screen space.

use bytemuck::{Pod, Zeroable};

use crate::chain::Frame;
use crate::visuals::ColorScheme;

/// Fixed drawing surface geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub column_width: u32,
}

impl Layout {
    pub const fn new(width: u32, height: u32, column_width: u32) -> Self {
        Self {
            width,
            height,
            column_width,
        }
    }

    /// Number of columns that fit across the width, truncated.
    pub fn column_count(&self) -> usize {
        if self.column_width == 0 {
            return 0;
        }
        (self.width / self.column_width) as usize
    }

    /// Vertical rest line.
    pub fn center_y(&self) -> f32 {
        self.height as f32 / 2.0
    }
}

/// One opaque bar in pixel space.
///
/// Laid out to be uploaded directly as a GPU instance.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Bar {
    /// `[left, top, width, height]` in pixels.
    pub rect: [f32; 4],
    /// RGBA, 0.0-1.0.
    pub color: [f32; 4],
}

impl Bar {
    #[inline]
    pub fn left(&self) -> f32 {
        self.rect[0]
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect[1]
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.rect[0] + self.rect[2]
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.rect[1] + self.rect[3]
    }
}

/// Build the bars for a frame.
pub fn bars(frame: &Frame<'_>, layout: &Layout, colors: &ColorScheme) -> Vec<Bar> {
    let width = layout.column_width as f32;
    let center = layout.center_y();

    frame
        .heights()
        .map(|(index, height)| {
            let x = index as f32 * width;
            let extent = height as f32;
            let top = center.min(center + extent);
            let color = colors.color(height, frame.tick);
            Bar {
                rect: [x - width / 2.0, top, width, extent.abs()],
                color: color.extend(1.0).to_array(),
            }
        })
        .collect()
}

/// Something that can present a frame.
///
/// Called once per tick, after the chain has advanced.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>);
}

impl<F> Renderer for F
where
    F: FnMut(&Frame<'_>),
{
    fn draw(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}
