//! Integer rectangle math for screen layout

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Grow (or shrink with negative values) around the center.
    /// Odd amounts put the extra pixel on the right/bottom.
    pub fn inflate(&self, dw: i32, dh: i32) -> Self {
        Self::new(
            self.x - dw / 2,
            self.y - dh / 2,
            (self.w + dw).max(0),
            (self.h + dh).max(0),
        )
    }

    /// Scale width and height by the given factors, keeping the center fixed
    pub fn scale_by(&self, sx: f32, sy: f32) -> Self {
        let w = (self.w as f32 * sx) as i32;
        let h = (self.h as f32 * sy) as i32;
        let (cx, cy) = self.center();
        Self::new(cx - w / 2, cy - h / 2, w, h)
    }

    /// A rect of the given size centered on a point
    pub fn centered_at(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, cy - h / 2, w, h)
    }

    /// True when `other` lies entirely inside this rect (edges may touch)
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
