use rand::Rng;

use super::color::{Rgb, BLUE, GREEN, WHITE};
use super::roll;
use crate::display::PixelBuffer;

const TRACKING_COLORS: [Rgb; 3] = [BLUE, GREEN, WHITE];
const MAX_LINES: usize = 3;
const MAX_THICKNESS: u32 = 40;

/// One full-width tracking bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingLine {
    /// Center row, anywhere in [0, H]
    pub y: i32,
    pub thickness: u32,
    pub color: Rgb,
}

impl TrackingLine {
    /// Rows above the buffer or past its bottom edge are clipped
    fn paint(&self, buffer: &mut PixelBuffer) {
        let (r, g, b) = self.color;
        let top = self.y - self.thickness as i32 / 2;
        buffer.fill_rect(0, top, buffer.width(), self.thickness, r, g, b);
    }
}

/// VHS tracking bars: when triggered, up to three full-width lines of
/// random thickness land at random rows. Returns the lines drawn.
pub fn add_tracking<R: Rng + ?Sized>(buffer: &mut PixelBuffer, probability: f64, rng: &mut R) -> Vec<TrackingLine> {
    if !roll(rng, probability) {
        return Vec::new();
    }

    let count = rng.gen_range(0..=MAX_LINES);
    let mut lines = Vec::with_capacity(count);
    for _ in 0..count {
        let line = TrackingLine {
            y: rng.gen_range(0..=buffer.height()) as i32,
            thickness: rng.gen_range(1..=MAX_THICKNESS),
            color: TRACKING_COLORS[rng.gen_range(0..TRACKING_COLORS.len())],
        };
        line.paint(buffer);
        lines.push(line);
    }
    lines
}
