//! 1-bit and 24-bit bitmap blits.

use super::BitmapMode;
use crate::Error;
use crate::color::{BrightnessTable, PackedColor, Rgb};
use crate::framebuffer::FrameBuffer;

/// Bytes per pixel of an RGB bitmap
const RGB_BYTES: usize = 3;

/// Row-padded 1-bit bitmap, MSB = leftmost pixel
struct Mask<'a> {
    data: &'a [u8],
    width: i64,
    height: i64,
    stride: usize,
}

impl Mask<'_> {
    /// Returns true if `(x, y)` is inside the bitmap and set
    #[inline]
    fn is_set(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * self.stride + (x as usize >> 3)];
        byte & (0x80 >> (x & 7)) != 0
    }

    /// A set pixel with at least one unset 8-neighbor
    fn is_edge(&self, x: i64, y: i64, left: i64, right: i64, up: i64, down: i64) -> bool {
        !(self.is_set(left, y)
            && self.is_set(right, y)
            && self.is_set(x, up)
            && self.is_set(x, down)
            && self.is_set(left, up)
            && self.is_set(right, up)
            && self.is_set(left, down)
            && self.is_set(right, down))
    }
}

impl FrameBuffer {
    /// Blit a 1-bit bitmap in `word`; with `outline` only boundary pixels of
    /// the source are drawn
    pub(crate) fn bitmap_1bit(
        &mut self,
        data: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        word: PackedColor,
        mode: BitmapMode,
        outline: bool,
    ) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let stride = width.div_ceil(8);
        if stride.checked_mul(height).is_none_or(|needed| data.len() < needed) {
            return Err(Error::InvalidBitmap);
        }
        let mask = Mask {
            data,
            width: width as i64,
            height: height as i64,
            stride,
        };
        let (x, y) = (i64::from(x), i64::from(y));
        let fb_w = self.width() as i64;
        let fb_h = self.height() as i64;

        match mode {
            BitmapMode::Place => {
                let rows = (-y).max(0)..mask.height.min(fb_h - y);
                let cols = (-x).max(0)..mask.width.min(fb_w - x);
                for sy in rows {
                    for sx in cols.clone() {
                        if mask.is_set(sx, sy)
                            && (!outline || mask.is_edge(sx, sy, sx - 1, sx + 1, sy - 1, sy + 1))
                        {
                            self.put((x + sx) as i32, (y + sy) as i32, word);
                        }
                    }
                }
            }
            BitmapMode::Tile => {
                for py in 0..fb_h {
                    let sy = (py - y).rem_euclid(mask.height);
                    for px in 0..fb_w {
                        let sx = (px - x).rem_euclid(mask.width);
                        if mask.is_set(sx, sy)
                            && (!outline || mask.is_edge(sx, sy, sx - 1, sx + 1, sy - 1, sy + 1))
                        {
                            self.put(px as i32, py as i32, word);
                        }
                    }
                }
            }
            BitmapMode::Stretch => {
                let scale_x = |px: i64| (px * mask.width).div_euclid(fb_w);
                let scale_y = |py: i64| (py * mask.height).div_euclid(fb_h);
                for py in 0..fb_h {
                    let sy = scale_y(py);
                    for px in 0..fb_w {
                        let sx = scale_x(px);
                        if mask.is_set(sx, sy)
                            && (!outline
                                || mask.is_edge(
                                    sx,
                                    sy,
                                    scale_x(px - 1),
                                    scale_x(px + 1),
                                    scale_y(py - 1),
                                    scale_y(py + 1),
                                ))
                        {
                            self.put(px as i32, py as i32, word);
                        }
                    }
                }
            }
        }
        self.mark_dirty();
        Ok(())
    }

    /// Blit a packed `r, g, b` byte bitmap through the brightness table
    pub(crate) fn bitmap_rgb(
        &mut self,
        data: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        mode: BitmapMode,
        table: &BrightnessTable,
    ) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let Some(stride) = width.checked_mul(RGB_BYTES) else {
            return Err(Error::InvalidBitmap);
        };
        if stride.checked_mul(height).is_none_or(|needed| data.len() < needed) {
            return Err(Error::InvalidBitmap);
        }
        let pixel = |sx: usize, sy: usize| {
            let i = sy * stride + sx * RGB_BYTES;
            table.pack(Rgb {
                r: data[i],
                g: data[i + 1],
                b: data[i + 2],
            })
        };
        let fb_w = self.width();
        let fb_h = self.height();

        match mode {
            BitmapMode::Place => {
                let (x, y) = (i64::from(x), i64::from(y));
                let (w, h) = (width as i64, height as i64);
                let col_from = (-x).max(0);
                let col_to = w.min(fb_w as i64 - x);
                if col_from >= col_to {
                    return Ok(());
                }
                for sy in (-y).max(0)..h.min(fb_h as i64 - y) {
                    let row = self.row_mut((y + sy) as usize);
                    let dst = &mut row[(x + col_from) as usize..(x + col_to) as usize];
                    for (out, sx) in dst.iter_mut().zip(col_from..col_to) {
                        *out = pixel(sx as usize, sy as usize);
                    }
                }
            }
            BitmapMode::Tile => {
                for py in 0..fb_h {
                    let sy = (py as i64 - i64::from(y)).rem_euclid(height as i64) as usize;
                    let row = self.row_mut(py);
                    for (px, out) in row.iter_mut().enumerate() {
                        let sx = (px as i64 - i64::from(x)).rem_euclid(width as i64) as usize;
                        *out = pixel(sx, sy);
                    }
                }
            }
            BitmapMode::Stretch => {
                for py in 0..fb_h {
                    let sy = (py as u64 * height as u64 / fb_h as u64) as usize;
                    let row = self.row_mut(py);
                    for (px, out) in row.iter_mut().enumerate() {
                        *out = pixel((px as u64 * width as u64 / fb_w as u64) as usize, sy);
                    }
                }
            }
        }
        self.mark_dirty();
        Ok(())
    }
}
