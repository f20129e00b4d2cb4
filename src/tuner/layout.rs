//! Screen geometry for the puzzle and idle screens
//!
//! Everything is derived from the framebuffer size once at startup. The
//! indicator position is the only value that changes per frame.

use super::slots::TargetRange;
use super::SLOT_COUNT;
use crate::geometry::Rect;

/// Height of the "NO SIGNAL" box
const NO_SIGNAL_BOX_HEIGHT: i32 = 80;

/// One labelled progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Top-left corner of the label text
    pub label: (i32, i32),
    pub bar: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub outer: Rect,
    pub inner: Rect,
    pub rows: [Row; SLOT_COUNT],
    pub title_center: (i32, i32),
    pub footer_center: (i32, i32),
    pub version_center: (i32, i32),
    pub no_signal_box: Rect,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);

        let outer = Rect::new(10, h / 5, w - 20, h - 2 * (h / 5));
        let inner = outer.inflate(-10, -10);
        let container = inner.inflate(-20, -20);
        let row_height = container.h / SLOT_COUNT as i32;

        let rows = std::array::from_fn(|i| {
            let row = Rect::new(
                container.x,
                container.y + i as i32 * row_height,
                container.w,
                row_height,
            );
            Row {
                label: (row.x, row.y),
                bar: row.scale_by(1.0, 0.4),
            }
        });

        Self {
            width: w,
            height: h,
            outer,
            inner,
            rows,
            title_center: (w / 2, h / 10),
            footer_center: (w / 2, (h as f32 * 0.9) as i32),
            version_center: (w / 2, (h as f32 * 0.95) as i32),
            no_signal_box: Rect::centered_at(
                w / 2,
                h / 2,
                (w as f32 * 0.8) as i32,
                NO_SIGNAL_BOX_HEIGHT,
            ),
        }
    }

    /// The accept window of a slot, in pixels on its bar
    pub fn allowed_rect(bar: &Rect, range: &TargetRange) -> Rect {
        let width = f64::from(bar.w);
        Rect::new(
            bar.x + (range.start * width) as i32,
            bar.y,
            ((range.end - range.start) * width) as i32,
            bar.h,
        )
    }

    /// The moving indicator on a bar at the given session time
    pub fn indicator_rect(bar: &Rect, elapsed_ms: u64, marker_width: i32, ms_per_px: u64) -> Rect {
        let offset = indicator_offset(elapsed_ms, ms_per_px, bar.w - marker_width);
        Rect::new(bar.x + offset, bar.y, marker_width, bar.h)
    }
}

/// Triangle wave over `0..=travel`, advancing one pixel every `ms_per_px`
pub fn indicator_offset(elapsed_ms: u64, ms_per_px: u64, travel: i32) -> i32 {
    if travel <= 0 {
        return 0;
    }
    let travel = travel as u64;
    let pos = (elapsed_ms / ms_per_px.max(1)) % (2 * travel);
    let pos = if pos >= travel { 2 * travel - pos } else { pos };
    pos as i32
}
