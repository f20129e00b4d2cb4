//! Drawing for each puzzle phase
//!
//! Screens only paint the base image. The caller decides whether the
//! effect pipeline runs on top and adds the border last.

use rand::Rng;

use super::{FrameTargets, Layout, Puzzle};
use crate::config::PuzzleConfig;
use crate::display::{draw_text_centered_scaled, draw_text_scaled, PixelBuffer};
use crate::effects::add_static;
use crate::effects::color::{self, Rgb};
use crate::geometry::Rect;

const ROW_LABELS: [&str; 3] = ["ESTABLISHING CONNECTION", "SENDING PACKETS", "OVERRIDING PROTOCOL"];

const SCREEN_BORDER: u32 = 8;
const FRAME_BORDER: u32 = 3;
const BAR_BORDER: u32 = 4;
const NO_SIGNAL_BORDER: u32 = 6;

fn fill(buffer: &mut PixelBuffer, rect: &Rect, (r, g, b): Rgb) {
    buffer.fill_rect(rect.x, rect.y, rect.w.max(0) as u32, rect.h.max(0) as u32, r, g, b);
}

fn outline(buffer: &mut PixelBuffer, rect: &Rect, thickness: u32, (r, g, b): Rgb) {
    buffer.draw_rect(
        rect.x,
        rect.y,
        rect.w.max(0) as u32,
        rect.h.max(0) as u32,
        thickness,
        r,
        g,
        b,
    );
}

fn centered_text(buffer: &mut PixelBuffer, (cx, cy): (i32, i32), text: &str, (r, g, b): Rgb, scale: u32) {
    draw_text_centered_scaled(buffer, cx, cy, text, r, g, b, scale);
}

/// Dark frame around the whole screen, drawn after effects
pub fn draw_screen_border(buffer: &mut PixelBuffer) {
    let (w, h) = (buffer.width(), buffer.height());
    let (r, g, b) = color::DARK_GRAY;
    buffer.draw_rect(0, 0, w, h, SCREEN_BORDER, r, g, b);
}

/// "NO SIGNAL" idle screen with heavy static
pub fn draw_idle<R: Rng + ?Sized>(buffer: &mut PixelBuffer, layout: &Layout, noise: f64, rng: &mut R) {
    let (r, g, b) = color::DARK_GRAY;
    buffer.clear(r, g, b);
    add_static(buffer, noise, rng);
    draw_screen_border(buffer);

    let panel = layout.no_signal_box;
    fill(buffer, &panel, color::BLACK);
    outline(buffer, &panel, NO_SIGNAL_BORDER, color::YELLOW);
    centered_text(buffer, panel.center(), "NO SIGNAL", color::WHITE, 3);
}

/// The three progress bars. Returns the geometry the action key is judged
/// against, or None when no slot is pending.
pub fn draw_puzzle(
    buffer: &mut PixelBuffer,
    layout: &Layout,
    puzzle: &Puzzle,
    elapsed_ms: u64,
    config: &PuzzleConfig,
) -> Option<FrameTargets> {
    let (r, g, b) = color::BLUE;
    buffer.clear(r, g, b);

    outline(buffer, &layout.outer, FRAME_BORDER, color::WHITE);
    outline(buffer, &layout.inner, FRAME_BORDER, color::WHITE);

    let current = puzzle.current_target();
    let mut targets = None;

    for ((slot, row), label) in puzzle.slots().iter().zip(&layout.rows).zip(ROW_LABELS) {
        let (r, g, b) = color::LIGHT_GRAY;
        draw_text_scaled(buffer, row.label.0, row.label.1, label, r, g, b, 2);

        let allowed = Layout::allowed_rect(&row.bar, &slot.range);
        fill(buffer, &allowed, color::LIGHT_BLUE);

        if current == Some(slot.index) {
            let indicator =
                Layout::indicator_rect(&row.bar, elapsed_ms, config.marker_width, config.marker_ms_per_px);
            fill(buffer, &indicator, color::WHITE);
            targets = Some(FrameTargets {
                slot: slot.index,
                allowed,
                indicator,
            });
        }

        outline(buffer, &row.bar, BAR_BORDER, color::WHITE);
    }

    centered_text(buffer, layout.title_center, "SYSTEM OVERRIDE", color::WHITE, 3);
    centered_text(buffer, layout.footer_center, "SECURITY FREQUENCY MATCH", color::WHITE, 2);
    centered_text(buffer, layout.version_center, "V0.34 - SEEGSON SYSTEMS", color::WHITE, 1);

    targets
}

/// Full-screen result card shown during a hold
pub fn draw_verdict(buffer: &mut PixelBuffer, layout: &Layout, granted: bool) {
    let (background, text) = if granted {
        (color::DARK_GREEN, "ACCESS GRANTED")
    } else {
        (color::RED, "ACCESS DENIED")
    };
    let (r, g, b) = background;
    buffer.clear(r, g, b);
    centered_text(
        buffer,
        (layout.width / 2, layout.height / 2),
        text,
        color::DARK_GRAY,
        3,
    );
    draw_screen_border(buffer);
}
