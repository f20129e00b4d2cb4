use rand::Rng;

use super::color::{Rgb, BLACK, BLUE};
use super::roll;
use crate::display::{BlendMode, PixelBuffer};

const DROPOUT_COLORS: [Rgb; 2] = [BLACK, BLUE];

/// Signal loss flash: when triggered, a translucent black or blue sheet at
/// a random alpha in [0, 255] covers the whole frame. Returns the alpha.
pub fn add_dropout<R: Rng + ?Sized>(buffer: &mut PixelBuffer, probability: f64, rng: &mut R) -> Option<u8> {
    if !roll(rng, probability) {
        return None;
    }
    let (r, g, b) = DROPOUT_COLORS[rng.gen_range(0..DROPOUT_COLORS.len())];
    let alpha: u8 = rng.gen();
    let mut sheet = PixelBuffer::transparent(buffer.width(), buffer.height());
    sheet.clear_rgba(r, g, b, alpha);
    buffer.composite_full(&sheet, BlendMode::Alpha);
    Some(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sheet_covers_every_pixel_uniformly() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut buffer = PixelBuffer::with_size(16, 9);
        buffer.clear(240, 242, 241);
        let alpha = add_dropout(&mut buffer, 1.0, &mut rng).unwrap();
        let first = buffer.get_pixel(0, 0).unwrap();
        for y in 0..9 {
            for x in 0..16 {
                assert_eq!(buffer.get_pixel(x, y), Some(first));
            }
        }
        if alpha > 16 {
            // Both sheet colors are darker than white in red
            assert!(first.0 < 240);
        }
    }

    #[test]
    fn test_no_flash_below_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(1, 2, 3);
        let before = buffer.clone();
        assert_eq!(add_dropout(&mut buffer, 0.0, &mut rng), None);
        assert_eq!(buffer, before);
    }
}
