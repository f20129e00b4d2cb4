use crate::display::{BlendMode, PixelBuffer};

pub const DEFAULT_THRESHOLD: u8 = 200;
pub const DEFAULT_FACTOR: f32 = 0.75;

/// Copy pixels whose R, G and B all exceed `threshold` (alpha included)
/// into a fully transparent overlay of the same size.
pub fn extract_bright(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    let (width, height) = (buffer.width() as i32, buffer.height() as i32);
    let mut overlay = PixelBuffer::transparent(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            if let Some((r, g, b, a)) = buffer.get_pixel_rgba(x, y) {
                if r > threshold && g > threshold && b > threshold {
                    overlay.set_pixel_rgba(x, y, r, g, b, a);
                }
            }
        }
    }
    overlay
}

/// Glow around bright areas.
///
/// The blur is a cheap approximation: the extracted overlay is shrunk by
/// `factor` and stretched back, then added channel-wise onto the frame.
pub fn add_bloom(buffer: &mut PixelBuffer, threshold: u8, factor: f32) {
    let (width, height) = (buffer.width(), buffer.height());
    let overlay = extract_bright(buffer, threshold);

    let small_w = ((width as f32 * factor) as u32).max(1);
    let small_h = ((height as f32 * factor) as u32).max(1);
    let glow = overlay
        .resample_smooth(small_w, small_h)
        .resample_smooth(width, height);

    buffer.composite_full(&glow, BlendMode::Additive);
}
