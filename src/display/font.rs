//! 8x8 bitmap font
//!
//! Glyphs come from the `font8x8` basic set: rows top to bottom, bit 0 is
//! the leftmost column. Characters outside it render as a blank cell.

use font8x8::{UnicodeFonts, BASIC_FONTS};

use super::PixelBuffer;

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;

/// Width in pixels of a string at the given scale
pub fn text_width_scaled(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_WIDTH * scale
}

/// Draw a single glyph with each bit expanded to a `scale` x `scale` block
pub fn draw_char_scaled(buffer: &mut PixelBuffer, x: i32, y: i32, ch: char, r: u8, g: u8, b: u8, scale: u32) {
    let glyph = BASIC_FONTS.get(ch).unwrap_or([0; 8]);
    let s = scale as i32;
    for (row, &bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH_WIDTH as i32 {
            if bits & (1 << col) != 0 {
                buffer.fill_rect(x + col * s, y + row as i32 * s, scale, scale, r, g, b);
            }
        }
    }
}

/// Draw text with its top-left corner at (x, y)
pub fn draw_text_scaled(buffer: &mut PixelBuffer, x: i32, y: i32, text: &str, r: u8, g: u8, b: u8, scale: u32) {
    let advance = (GLYPH_WIDTH * scale) as i32;
    for (i, ch) in text.chars().enumerate() {
        draw_char_scaled(buffer, x + i as i32 * advance, y, ch, r, g, b, scale);
    }
}

/// Draw text at scale 1
pub fn draw_text(buffer: &mut PixelBuffer, x: i32, y: i32, text: &str, r: u8, g: u8, b: u8) {
    draw_text_scaled(buffer, x, y, text, r, g, b, 1);
}

/// Draw text centered on (cx, cy)
pub fn draw_text_centered_scaled(
    buffer: &mut PixelBuffer,
    cx: i32,
    cy: i32,
    text: &str,
    r: u8,
    g: u8,
    b: u8,
    scale: u32,
) {
    let w = text_width_scaled(text, scale) as i32;
    let h = (GLYPH_HEIGHT * scale) as i32;
    draw_text_scaled(buffer, cx - w / 2, cy - h / 2, text, r, g, b, scale);
}
