use rand::Rng;

use super::roll;
use crate::display::PixelBuffer;

const MAX_COLOR_SHIFT: i32 = 20;
const GREEN_FLOOR: i32 = 100;
const GREEN_CEIL: i32 = 255;

/// Color subcarrier drift: when triggered, nudges the green channel of the
/// whole frame by one shift in [-20, 20]. Returns the shift applied.
pub fn add_distortion<R: Rng + ?Sized>(buffer: &mut PixelBuffer, probability: f64, rng: &mut R) -> Option<i32> {
    if !roll(rng, probability) {
        return None;
    }
    let shift = rng.gen_range(-MAX_COLOR_SHIFT..=MAX_COLOR_SHIFT);
    shift_green(buffer, shift);
    Some(shift)
}

/// Add `shift` to every green value, clamped to [100, 255].
/// Red, blue and alpha are left alone.
pub fn shift_green(buffer: &mut PixelBuffer, shift: i32) {
    // ABGR layout: [2] = G
    for px in buffer.as_bytes_mut().chunks_exact_mut(4) {
        px[2] = (px[2] as i32 + shift).clamp(GREEN_FLOOR, GREEN_CEIL) as u8;
    }
}
