use rand::Rng;

use super::roll;
use crate::display::PixelBuffer;

/// Height of the horizontal slices moved together
pub const STRIP_HEIGHT: u32 = 10;

/// A triggered horizontal shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftEvent {
    pub offset: i32,
    /// Which of the two glitch clips should play
    pub glitch: usize,
}

/// Horizontal hold slip: when triggered, every strip of the frame is
/// re-blitted `offset` pixels sideways, with `offset` in [-W/10, W/10].
pub fn add_shifting<R: Rng + ?Sized>(buffer: &mut PixelBuffer, probability: f64, rng: &mut R) -> Option<ShiftEvent> {
    if !roll(rng, probability) {
        return None;
    }

    let max_offset = (buffer.width() / 10) as i32;
    let offset = rng.gen_range(-max_offset..=max_offset);
    shift_strips(buffer, offset);

    Some(ShiftEvent {
        offset,
        glitch: rng.gen_range(0..2),
    })
}

/// Copy each strip and draw it back at (offset, y). Nothing wraps around:
/// the columns the strip moved away from keep their previous pixels.
pub fn shift_strips(buffer: &mut PixelBuffer, offset: i32) {
    let width = buffer.width();
    let height = buffer.height();
    for y in (0..height).step_by(STRIP_HEIGHT as usize) {
        let strip_height = STRIP_HEIGHT.min(height - y);
        let strip = buffer.copy_region(0, y as i32, width, strip_height);
        buffer.blit(&strip, offset, y as i32);
    }
}
