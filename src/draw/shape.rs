//! Rectangles and ellipses, axis-aligned and rotated.

use super::{ShapeWords, clip_axis};
use crate::framebuffer::FrameBuffer;

/// Scan rows are sampled at their vertical center
const ROW_CENTER: f32 = 0.5;
/// Largest radius drawn with the integer midpoint walk; bigger ellipses are
/// scanned row by row
const MIDPOINT_MAX_RADIUS: i32 = 1 << 12;

impl FrameBuffer {
    /// Axis-aligned rectangle with top-left corner `(x, y)`
    pub(crate) fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, style: ShapeWords) {
        self.rect_box(i64::from(x), i64::from(y), i64::from(w), i64::from(h), style);
    }

    fn rect_box(&mut self, x: i64, y: i64, w: i64, h: i64, style: ShapeWords) {
        if w <= 0 || h <= 0 || style.is_empty() {
            return;
        }
        let (x1, y1) = (x + w - 1, y + h - 1);
        let (width, height) = (self.width(), self.height());
        if x1 < 0 || y1 < 0 || x >= width as i64 || y >= height as i64 {
            return;
        }
        let clip_x = |v: i64| clip_axis(v, width);
        let clip_y = |v: i64| clip_axis(v, height);

        if let Some((word, inset)) = style.interior() {
            let (xa, xb, ya, yb) = if inset {
                (x + 1, x1 - 1, y + 1, y1 - 1)
            } else {
                (x, x1, y, y1)
            };
            if xa <= xb {
                for row in clip_y(ya).max(0)..=clip_y(yb).min(height as i32 - 1) {
                    self.hspan(row, clip_x(xa), clip_x(xb), word);
                }
            }
        }

        if let Some(word) = style.outline {
            self.hspan(clip_y(y), clip_x(x), clip_x(x1), word);
            if y1 != y {
                self.hspan(clip_y(y1), clip_x(x), clip_x(x1), word);
            }
            if h > 2 {
                self.vspan(clip_x(x), clip_y(y + 1), clip_y(y1 - 1), word);
                if x1 != x {
                    self.vspan(clip_x(x1), clip_y(y + 1), clip_y(y1 - 1), word);
                }
            }
        }
        self.mark_dirty();
    }

    /// Rectangle of `w` x `h` centered on `(cx, cy)`, rotated by `angle_deg`
    ///
    /// Multiples of 90 degrees take the axis-aligned path, with width and
    /// height swapped at 90 and 270.
    pub(crate) fn rect_rotated(&mut self, cx: i32, cy: i32, w: i32, h: i32, angle_deg: f32, style: ShapeWords) {
        if w <= 0 || h <= 0 || style.is_empty() || !angle_deg.is_finite() {
            return;
        }
        let angle = normalize_degrees(angle_deg);
        if angle % 90.0 == 0.0 {
            let (w, h) = if angle == 90.0 || angle == 270.0 {
                (h, w)
            } else {
                (w, h)
            };
            self.rect_box(
                i64::from(cx) - i64::from(w >> 1),
                i64::from(cy) - i64::from(h >> 1),
                i64::from(w),
                i64::from(h),
                style,
            );
            return;
        }

        let half_w = (w - 1) as f32 / 2.0;
        let half_h = (h - 1) as f32 / 2.0;
        let rad = angle.to_radians();
        let (sa, ca) = (libm::sinf(rad), libm::cosf(rad));
        let rotate = |ix: f32, iy: f32| (cx as f32 + ix * ca - iy * sa, cy as f32 + ix * sa + iy * ca);
        let corners = [
            rotate(-half_w, -half_h),
            rotate(half_w, -half_h),
            rotate(half_w, half_h),
            rotate(-half_w, half_h),
        ];

        let (min_y, max_y) = corners
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &(_, py)| (lo.min(py), hi.max(py)));
        let y_min = (libm::ceilf(min_y) as i32).max(0);
        let y_max = (libm::floorf(max_y) as i32).min(self.height() as i32 - 1);

        for py in y_min..=y_max {
            let Some((left, right)) = scan_polygon(&corners, py as f32 + ROW_CENTER) else {
                continue;
            };
            if let Some((word, inset)) = style.interior() {
                let (xa, xb) = if inset {
                    (
                        (libm::ceilf(left) as i32).saturating_add(1),
                        (libm::floorf(right) as i32).saturating_sub(1),
                    )
                } else {
                    (libm::ceilf(left) as i32, libm::floorf(right) as i32)
                };
                if xa <= xb {
                    self.hspan(py, xa, xb, word);
                }
            }
            if let Some(word) = style.outline {
                let xl = libm::floorf(left + 0.5) as i32;
                let xr = libm::floorf(right + 0.5) as i32;
                self.put(xl, py, word);
                if xr != xl {
                    self.put(xr, py, word);
                }
            }
        }
        self.mark_dirty();
    }

    /// Ellipse centered on `(cx, cy)` with radii `rx`, `ry`, rotated by
    /// `angle_deg`
    pub(crate) fn ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, angle_deg: f32, style: ShapeWords) {
        if rx <= 0 || ry <= 0 || style.is_empty() || !angle_deg.is_finite() {
            return;
        }
        let reach = i64::from(rx.max(ry));
        let (cx64, cy64) = (i64::from(cx), i64::from(cy));
        if cx64 + reach < 0
            || cy64 + reach < 0
            || cx64 - reach >= self.width() as i64
            || cy64 - reach >= self.height() as i64
        {
            return;
        }
        let small = rx <= MIDPOINT_MAX_RADIUS && ry <= MIDPOINT_MAX_RADIUS;
        if normalize_degrees(angle_deg) == 0.0 && small {
            self.ellipse_midpoint(cx, cy, rx, ry, style);
        } else {
            self.ellipse_rotated(cx, cy, rx, ry, angle_deg, style);
        }
        self.mark_dirty();
    }

    /// Integer midpoint algorithm, one quadrant mirrored four ways
    fn ellipse_midpoint(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, style: ShapeWords) {
        let rx2 = i64::from(rx) * i64::from(rx);
        let ry2 = i64::from(ry) * i64::from(ry);
        let two_rx2 = rx2 << 1;
        let two_ry2 = ry2 << 1;

        let mut x: i64 = 0;
        let mut y = i64::from(ry);
        let mut dx: i64 = 0;
        let mut dy = two_rx2 * y;

        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let (width, height) = (self.width(), self.height());
        let plot = |fb: &mut Self, x: i64, y: i64| {
            let (xl, xr) = (clip_axis(cx - x, width), clip_axis(cx + x, width));
            let (yt, yb) = (clip_axis(cy - y, height), clip_axis(cy + y, height));
            if let Some(word) = style.fill {
                fb.hspan(yb, xl, xr, word);
                fb.hspan(yt, xl, xr, word);
            }
            if let Some(word) = style.outline {
                fb.put(xr, yb, word);
                fb.put(xl, yb, word);
                fb.put(xr, yt, word);
                fb.put(xl, yt, word);
            }
        };

        // Region 1: slope shallower than -1
        let mut d1 = ry2 - rx2 * y + (rx2 >> 2);
        while dx < dy {
            plot(self, x, y);
            x += 1;
            dx += two_ry2;
            if d1 < 0 {
                d1 += dx + ry2;
            } else {
                y -= 1;
                dy -= two_rx2;
                d1 += dx - dy + ry2;
            }
        }

        // Region 2, decision variable scaled by 4 to stay integral
        let mut d2 = ry2 * (2 * x + 1) * (2 * x + 1) + 4 * rx2 * (y - 1) * (y - 1) - 4 * rx2 * ry2;
        while y >= 0 {
            plot(self, x, y);
            y -= 1;
            if d2 > 0 {
                d2 += 4 * (rx2 - two_rx2 * y);
            } else {
                x += 1;
                d2 += 4 * (two_ry2 * x + rx2 - two_rx2 * y);
            }
        }
    }

    /// Per-row span from the roots of the rotated ellipse's quadratic
    fn ellipse_rotated(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, angle_deg: f32, style: ShapeWords) {
        let th = angle_deg.to_radians();
        let (st, ct) = (libm::sinf(th), libm::cosf(th));
        let inv_rx2 = 1.0 / (rx as f32 * rx as f32);
        let inv_ry2 = 1.0 / (ry as f32 * ry as f32);
        let a = ct * ct * inv_rx2 + st * st * inv_ry2;
        let b = 2.0 * ct * st * (inv_rx2 - inv_ry2);
        let c = st * st * inv_rx2 + ct * ct * inv_ry2;

        let bound = (rx as f32 * st).abs() + (ry as f32 * ct).abs();
        let y0 = ((cy as f32 - bound) as i32).saturating_sub(1).max(0);
        let y1 = ((cy as f32 + bound) as i32)
            .saturating_add(1)
            .min(self.height() as i32 - 1);
        let width = self.width() as i32;

        for py in y0..=y1 {
            let dy = (i64::from(py) - i64::from(cy)) as f32;
            let by = b * dy;
            let k = c * dy * dy - 1.0;
            let disc = by * by - 4.0 * a * k;
            if disc < 0.0 {
                continue;
            }
            let root = libm::sqrtf(disc);
            let xl = libm::ceilf(cx as f32 + (-by - root) / (2.0 * a)) as i32;
            let xr = libm::floorf(cx as f32 + (-by + root) / (2.0 * a)) as i32;
            if xr < 0 || xl >= width || xl > xr {
                continue;
            }
            if let Some(word) = style.fill {
                self.hspan(py, xl, xr, word);
            }
            if let Some(word) = style.outline {
                self.put(xl, py, word);
                if xr != xl {
                    self.put(xr, py, word);
                }
            }
        }
    }
}

/// Angle folded into `[0, 360)`
fn normalize_degrees(angle: f32) -> f32 {
    let folded = angle % 360.0;
    if folded < 0.0 { folded + 360.0 } else { folded }
}

/// Leftmost and rightmost crossing of the scan line `sy` with the closed
/// polygon `corners`
fn scan_polygon(corners: &[(f32, f32)], sy: f32) -> Option<(f32, f32)> {
    let mut left = f32::MAX;
    let mut right = f32::MIN;
    let mut hits = 0;
    for (i, &(x0, y0)) in corners.iter().enumerate() {
        let (x1, y1) = corners[(i + 1) % corners.len()];
        if y0 == y1 {
            continue;
        }
        let ((xa, ya), (xb, yb)) = if y0 < y1 {
            ((x0, y0), (x1, y1))
        } else {
            ((x1, y1), (x0, y0))
        };
        if sy < ya || sy >= yb {
            continue;
        }
        let x = xa + (sy - ya) / (yb - ya) * (xb - xa);
        left = left.min(x);
        right = right.max(x);
        hits += 1;
    }
    (hits >= 2).then_some((left, right))
}
