use rand::Rng;
use rand_distr::StandardNormal;

use super::color::{Rgb, DARK_GRAY, GRAY, LIGHT_GRAY, WHITE};
use crate::display::PixelBuffer;

const SPECK_COLORS: [Rgb; 4] = [GRAY, DARK_GRAY, LIGHT_GRAY, WHITE];

/// Chance that a speck drags a horizontal streak behind it
const STREAK_CHANCE: f64 = 0.02;
const STREAK_MEAN: f64 = 8.0;
const STREAK_STD_DEV: f64 = 4.0;

#[inline]
fn speck_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    SPECK_COLORS[rng.gen_range(0..SPECK_COLORS.len())]
}

/// Sprinkle gray static over the buffer.
///
/// The speck count is `round(W * H * u)` with `u` drawn from
/// `[noise / 2, noise]` on every call, so density flickers frame to frame.
/// Streaks run rightward from their speck and stop at the right edge.
/// Returns the number of specks drawn.
pub fn add_static<R: Rng + ?Sized>(buffer: &mut PixelBuffer, noise: f64, rng: &mut R) -> usize {
    let width = buffer.width();
    let height = buffer.height();
    if width == 0 || height == 0 {
        return 0;
    }

    // Past full coverage the screen is already solid snow
    let noise = noise.clamp(0.0, 1.0);
    let density = rng.gen_range(noise / 2.0..=noise);
    let count = (f64::from(width * height) * density).round() as usize;

    for _ in 0..count {
        let x = rng.gen_range(0..width) as i32;
        let y = rng.gen_range(0..height) as i32;
        let (r, g, b) = speck_color(rng);
        buffer.set_pixel(x, y, r, g, b);

        if rng.gen::<f64>() < STREAK_CHANCE {
            let z: f64 = rng.sample(StandardNormal);
            let length = (STREAK_MEAN + STREAK_STD_DEV * z).round();
            if length > 0.0 {
                let end = (x + length as i32).min(width as i32);
                for sx in x..end {
                    let (r, g, b) = speck_color(rng);
                    buffer.set_pixel(sx, y, r, g, b);
                }
            }
        }
    }

    count
}
