//! CPU rasterizer for headless runs and tests.

use crate::chain::Frame;
use crate::render::{bars, Bar, Layout, Renderer};
use crate::visuals::ColorScheme;

/// A fixed-size `0RGB` pixel buffer, cleared to black every frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    layout: Layout,
    colors: ColorScheme,
    pixels: Vec<u32>,
    frames: u64,
}

impl Canvas {
    pub fn new(layout: Layout, colors: ColorScheme) -> Self {
        Self {
            layout,
            colors,
            pixels: vec![0; layout.width as usize * layout.height as usize],
            frames: 0,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Fill one bar, clipped to the canvas.
    pub fn fill_bar(&mut self, bar: &Bar) {
        let (w, h) = (self.layout.width as f32, self.layout.height as f32);
        let x0 = bar.left().round().clamp(0.0, w) as usize;
        let x1 = bar.right().round().clamp(0.0, w) as usize;
        let y0 = bar.top().round().clamp(0.0, h) as usize;
        let y1 = bar.bottom().round().clamp(0.0, h) as usize;
        let pixel = pack_rgb(bar.color);
        let stride = self.layout.width as usize;

        for y in y0..y1 {
            self.pixels[y * stride + x0..y * stride + x1].fill(pixel);
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.layout.width || y >= self.layout.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.layout.width as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for Canvas {
    fn draw(&mut self, frame: &Frame<'_>) {
        self.clear();
        for bar in bars(frame, &self.layout, &self.colors) {
            self.fill_bar(&bar);
        }
        self.frames += 1;
    }
}

/// Pack an RGBA color (0.0-1.0) into `0RGB`, dropping alpha.
pub fn pack_rgb(color: [f32; 4]) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(color[0]) << 16) | (channel(color[1]) << 8) | channel(color[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::Oscillator;
    use glam::Vec3;

    const WHITE: u32 = 0x00FF_FFFF;

    fn frame_of(columns: &[Oscillator]) -> Frame<'_> {
        Frame { tick: 0, columns }
    }

    #[test]
    fn test_pack_rgb() {
        assert_eq!(pack_rgb([1.0, 0.0, 0.0, 1.0]), 0x00FF_0000);
        assert_eq!(pack_rgb([0.0, 1.0, 0.0, 1.0]), 0x0000_FF00);
        assert_eq!(pack_rgb([0.0, 0.0, 1.0, 0.5]), 0x0000_00FF);
        assert_eq!(pack_rgb([2.0, -1.0, 0.0, 1.0]), 0x00FF_0000);
    }

    #[test]
    fn test_draws_bar_from_center() {
        let mut canvas = Canvas::new(Layout::new(40, 20, 10), ColorScheme::Solid(Vec3::ONE));
        let cols = vec![Oscillator::new(1, 5.0, 0.0)];
        canvas.draw(&frame_of(&cols));

        // Column 1 spans x 5..15, y 10..15
        assert_eq!(canvas.pixel(5, 10), Some(WHITE));
        assert_eq!(canvas.pixel(14, 14), Some(WHITE));
        assert_eq!(canvas.pixel(15, 10), Some(0));
        assert_eq!(canvas.pixel(10, 15), Some(0));
        assert_eq!(canvas.pixel(10, 9), Some(0));
        assert_eq!(canvas.frames(), 1);
        assert_eq!(canvas.layout().column_count(), 4);
        assert_eq!(canvas.pixels().len(), 40 * 20);
    }

    #[test]
    fn test_clips_to_canvas() {
        let mut canvas = Canvas::new(Layout::new(20, 20, 10), ColorScheme::Solid(Vec3::ONE));
        let cols = vec![Oscillator::new(0, -500.0, 0.0)];
        canvas.draw(&frame_of(&cols));

        // Left half of column 0 is off-screen; the bar runs to the top edge
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
        assert_eq!(canvas.pixel(4, 9), Some(WHITE));
        assert_eq!(canvas.pixel(5, 0), Some(0));
        assert_eq!(canvas.pixel(0, 10), Some(0));
        assert_eq!(canvas.pixel(20, 0), None);
    }

    #[test]
    fn test_clears_between_frames() {
        let mut canvas = Canvas::new(Layout::new(20, 20, 10), ColorScheme::Solid(Vec3::ONE));
        let tall = vec![Oscillator::new(1, 8.0, 0.0)];
        canvas.draw(&frame_of(&tall));
        assert_eq!(canvas.pixel(10, 15), Some(WHITE));

        let flat = vec![Oscillator::new(1, 0.0, 0.0)];
        canvas.draw(&frame_of(&flat));
        assert!(canvas.pixels().iter().all(|&p| p == 0));
    }
}
