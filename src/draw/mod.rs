//! Drawing primitives on the framebuffer
//!
//! Every primitive clips to the buffer before writing and marks it dirty.
//! Colors arrive already packed; the matrix converts `Rgb` through its
//! brightness table once per call.

mod bitmap;
mod shape;

use crate::color::{PackedColor, Rgb};
use crate::framebuffer::FrameBuffer;

/// Outline and fill colors of a closed shape
///
/// With only `fill` set, the fill covers the whole shape including its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeStyle {
    pub outline: Option<Rgb>,
    pub fill: Option<Rgb>,
}

impl ShapeStyle {
    pub const fn outline(color: Rgb) -> Self {
        Self {
            outline: Some(color),
            fill: None,
        }
    }

    pub const fn filled(color: Rgb) -> Self {
        Self {
            outline: None,
            fill: Some(color),
        }
    }

    #[must_use]
    pub const fn with_fill(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Placement of a bitmap blit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapMode {
    /// Once, top-left corner at `(x, y)`
    #[default]
    Place,
    /// Repeated over the whole buffer, phase set by `(x, y)`
    Tile,
    /// Nearest-neighbor scaled to the whole buffer
    Stretch,
}

/// Packed outline / fill pair handed to the framebuffer primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShapeWords {
    pub(crate) outline: Option<PackedColor>,
    pub(crate) fill: Option<PackedColor>,
}

impl ShapeWords {
    const fn is_empty(&self) -> bool {
        self.outline.is_none() && self.fill.is_none()
    }

    /// Fill word and whether it stops one pixel inside the edge
    const fn interior(&self) -> Option<(PackedColor, bool)> {
        match self.fill {
            Some(word) => Some((word, self.outline.is_some())),
            None => None,
        }
    }
}

/// `v` clamped to one pixel past either edge of an axis of `size`
///
/// Spans keep their order and off-buffer ends stay off-buffer, so clipping
/// works the same after narrowing to `i32`.
#[inline]
pub(crate) fn clip_axis(v: i64, size: usize) -> i32 {
    v.clamp(-1, size as i64) as i32
}

impl FrameBuffer {
    /// Straight line between two points, both inclusive
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, word: PackedColor) {
        self.segment(
            i64::from(x0),
            i64::from(y0),
            i64::from(x1),
            i64::from(y1),
            word,
        );
    }

    fn segment(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, word: PackedColor) {
        let (width, height) = (self.width(), self.height());
        if x0.max(x1) < 0
            || y0.max(y1) < 0
            || x0.min(x1) >= width as i64
            || y0.min(y1) >= height as i64
        {
            return;
        }
        if y0 == y1 {
            self.hspan(y0 as i32, clip_axis(x0, width), clip_axis(x1, width), word);
            self.mark_dirty();
            return;
        }
        if x0 == x1 {
            self.vspan(x0 as i32, clip_axis(y0, height), clip_axis(y1, height), word);
            self.mark_dirty();
            return;
        }

        // Bresenham; a line leaves the buffer at most once
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        let mut entered = false;
        loop {
            let inside = self.contains_wide(x, y);
            if inside {
                self.put(x as i32, y as i32, word);
                entered = true;
            } else if entered {
                break;
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = err << 1;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        self.mark_dirty();
    }

    #[inline]
    fn contains_wide(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Line of `length` centered on `(cx, cy)` at `angle_deg` clockwise from
    /// the +x axis
    pub fn line_polar(&mut self, cx: i32, cy: i32, length: i32, angle_deg: i32, word: PackedColor) {
        let half = i64::from(length >> 1);
        if half <= 0 {
            return;
        }
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let angle = angle_deg.rem_euclid(360);
        match angle {
            0 | 180 => return self.segment(cx - half, cy, cx + half, cy, word),
            90 | 270 => return self.segment(cx, cy - half, cx, cy + half, word),
            _ => {}
        }

        let rad = (angle as f32).to_radians();
        let dx = libm::roundf(libm::cosf(rad) * half as f32) as i64;
        let dy = libm::roundf(libm::sinf(rad) * half as f32) as i64;
        self.segment(cx - dx, cy - dy, cx + dx, cy + dy, word);
    }
}
