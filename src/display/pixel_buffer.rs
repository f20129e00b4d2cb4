// ============================================================================
// Blend Mode
// ============================================================================

/// Compositing blend mode for `composite()` / `composite_full()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard source-over alpha blending
    Alpha,
    /// Pure channel-wise RGB add, saturating. Source alpha is ignored.
    Additive,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    write_pixel_rgba(dest, r, g, b, 255);
}

/// Write ABGR pixel with custom alpha (overlays keep real transparency)
#[inline]
fn write_pixel_rgba(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    dest[0] = a; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

/// Source taps for one axis of a smooth resample: (source index, weight).
/// Shrinking averages the covered source span, enlarging interpolates linearly.
fn axis_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|d| {
            if scale > 1.0 {
                let start = d as f32 * scale;
                let end = (start + scale).min(src_len as f32);
                let mut taps = Vec::with_capacity(scale.ceil() as usize + 1);
                let mut s = start.floor() as u32;
                while (s as f32) < end && s < src_len {
                    let overlap = end.min(s as f32 + 1.0) - start.max(s as f32);
                    if overlap > 0.0 {
                        taps.push((s as usize, overlap / scale));
                    }
                    s += 1;
                }
                taps
            } else {
                let center = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
                let i0 = (center.floor() as u32).min(src_len - 1);
                let i1 = (i0 + 1).min(src_len - 1);
                let t = (center - i0 as f32).clamp(0.0, 1.0);
                vec![(i0 as usize, 1.0 - t), (i1 as usize, t)]
            }
        })
        .collect()
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
/// Every screen and post effect draws into one of these before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create an opaque black pixel buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut buffer = Self::transparent(width, height);
        buffer.clear(0, 0, 0);
        buffer
    }

    /// Create a fully transparent buffer (for overlays)
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid opaque color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        self.clear_rgba(r, g, b, 255);
    }

    /// Clear to a solid color with custom alpha
    pub fn clear_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            write_pixel_rgba(chunk, r, g, b, a);
        }
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        self.set_pixel_rgba(x, y, r, g, b, 255);
    }

    /// Set a single pixel with custom alpha (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel_rgba(&mut self.pixels[idx..idx + 4], r, g, b, a);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[cfg(test)]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        self.get_pixel_rgba(x, y).map(|(r, g, b, _)| (r, g, b))
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    /// Clip a horizontal span to the buffer. Returns (start, end) inclusive.
    #[inline]
    fn clip_span(&self, x1: i32, x2: i32, y: i32) -> Option<(i32, i32)> {
        if y < 0 || y >= self.height as i32 {
            return None;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        (start <= end).then_some((start, end))
    }

    /// Draw a horizontal line
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8) {
        let Some((start, end)) = self.clip_span(x1, x2, y) else {
            return;
        };
        let from = self.pixel_index(start as u32, y as u32);
        let to = self.pixel_index(end as u32, y as u32) + 4;
        for chunk in self.pixels[from..to].chunks_exact_mut(4) {
            write_pixel(chunk, r, g, b);
        }
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, r: u8, g: u8, b: u8) {
        if w == 0 {
            return;
        }
        for row in 0..h as i32 {
            self.hline(x, x + w as i32 - 1, y + row, r, g, b);
        }
    }

    /// Draw a rectangle outline growing inward from the edges
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, thickness: u32, r: u8, g: u8, b: u8) {
        let t = thickness.min(w / 2).min(h / 2).max(1);
        if w <= 2 * t || h <= 2 * t {
            self.fill_rect(x, y, w, h, r, g, b);
            return;
        }
        let (wi, hi, ti) = (w as i32, h as i32, t as i32);
        self.fill_rect(x, y, w, t, r, g, b);
        self.fill_rect(x, y + hi - ti, w, t, r, g, b);
        self.fill_rect(x, y + ti, t, h - 2 * t, r, g, b);
        self.fill_rect(x + wi - ti, y + ti, t, h - 2 * t, r, g, b);
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Copy a rectangular region into a new buffer. Parts of the region that
    /// fall outside this buffer come back transparent.
    pub fn copy_region(&self, x: i32, y: i32, w: u32, h: u32) -> PixelBuffer {
        let mut region = PixelBuffer::transparent(w, h);
        for ry in 0..h as i32 {
            let sy = y + ry;
            if sy < 0 || sy >= self.height as i32 {
                continue;
            }
            let x_start = x.max(0);
            let x_end = (x + w as i32).min(self.width as i32);
            if x_start >= x_end {
                continue;
            }
            let src = self.pixel_index(x_start as u32, sy as u32);
            let dst = region.pixel_index((x_start - x) as u32, ry as u32);
            let len = ((x_end - x_start) * 4) as usize;
            region.pixels[dst..dst + len].copy_from_slice(&self.pixels[src..src + len]);
        }
        region
    }

    /// Copy another buffer onto this one at position (x, y).
    /// All four channels are copied; columns and rows outside are dropped.
    pub fn blit(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        let dx_start = x.max(0);
        let dx_end = (x + src.width as i32).min(dst_w);
        if dx_start >= dx_end {
            return;
        }
        let len = ((dx_end - dx_start) * 4) as usize;

        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= dst_h {
                continue;
            }
            let si = src.pixel_index((dx_start - x) as u32, sy as u32);
            let di = self.pixel_index(dx_start as u32, dy as u32);
            self.pixels[di..di + len].copy_from_slice(&src.pixels[si..si + len]);
        }
    }

    /// Composite a source buffer onto this one.
    /// Alpha mode uses per-pixel source alpha and skips fully transparent pixels.
    pub fn composite(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32, mode: BlendMode) {
        let src_w = src.width() as i32;
        let src_h = src.height() as i32;

        for sy in 0..src_h {
            let dy = dst_y + sy;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }

            for sx in 0..src_w {
                let dx = dst_x + sx;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }

                let si = src.pixel_index(sx as u32, sy as u32);
                let sa = src.pixels[si];
                let sr = src.pixels[si + 3];
                let sg = src.pixels[si + 2];
                let sb = src.pixels[si + 1];

                let di = self.pixel_index(dx as u32, dy as u32);

                match mode {
                    BlendMode::Alpha => {
                        if sa == 0 {
                            continue;
                        }
                        if sa == 255 {
                            // Fully opaque — direct copy
                            write_pixel(&mut self.pixels[di..di + 4], sr, sg, sb);
                        } else {
                            let alpha = sa as u16;
                            self.pixels[di] = 255;
                            self.pixels[di + 1] = blend_channel(sb, self.pixels[di + 1], alpha);
                            self.pixels[di + 2] = blend_channel(sg, self.pixels[di + 2], alpha);
                            self.pixels[di + 3] = blend_channel(sr, self.pixels[di + 3], alpha);
                        }
                    },
                    BlendMode::Additive => {
                        self.pixels[di + 1] = self.pixels[di + 1].saturating_add(sb);
                        self.pixels[di + 2] = self.pixels[di + 2].saturating_add(sg);
                        self.pixels[di + 3] = self.pixels[di + 3].saturating_add(sr);
                    },
                }
            }
        }
    }

    /// Convenience: composite at (0, 0) — buffers should be the same size
    pub fn composite_full(&mut self, src: &PixelBuffer, mode: BlendMode) {
        self.composite(src, 0, 0, mode);
    }

    /// Resample into a new buffer of the given size.
    /// Separable: box-averages when shrinking, bilinear when enlarging.
    /// All four channels are filtered independently.
    pub fn resample_smooth(&self, new_width: u32, new_height: u32) -> PixelBuffer {
        let mut out = PixelBuffer::transparent(new_width, new_height);
        if new_width == 0 || new_height == 0 || self.width == 0 || self.height == 0 {
            return out;
        }

        let x_taps = axis_taps(self.width, new_width);
        let y_taps = axis_taps(self.height, new_height);

        // Horizontal pass: self (w x h) -> temp (new_w x h)
        let mut temp = vec![0.0f32; (new_width * self.height * 4) as usize];
        for y in 0..self.height as usize {
            let row = y * self.width as usize * 4;
            for (dx, taps) in x_taps.iter().enumerate() {
                let ti = (y * new_width as usize + dx) * 4;
                for &(sx, weight) in taps {
                    let si = row + sx * 4;
                    for c in 0..4 {
                        temp[ti + c] += self.pixels[si + c] as f32 * weight;
                    }
                }
            }
        }

        // Vertical pass: temp -> out (new_w x new_h)
        let stride = new_width as usize * 4;
        for (dy, taps) in y_taps.iter().enumerate() {
            for dx in 0..new_width as usize {
                let mut acc = [0.0f32; 4];
                for &(sy, weight) in taps {
                    let ti = sy * stride + dx * 4;
                    for c in 0..4 {
                        acc[c] += temp[ti + c] * weight;
                    }
                }
                let oi = dy * stride + dx * 4;
                for c in 0..4 {
                    out.pixels[oi + c] = acc[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        out
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to raw pixels for per-pixel effects.
    /// Layout is ABGR per pixel: [0]=A, [1]=B, [2]=G, [3]=R
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}
