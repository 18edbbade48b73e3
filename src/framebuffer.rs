//! Row-major framebuffer of packed pixel words.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::PackedColor;

/// Anything the output pipeline can scatter into the transmit buffers.
///
/// Each display row is returned as two slices whose concatenation is the
/// row, so wrap-around stores can hand out their window without copying.
pub trait PixelSource {
    fn row(&self, y: usize) -> (&[PackedColor], &[PackedColor]);
}

/// The display's composition surface
///
/// Owned by the matrix, mutated only by drawing primitives and read only by
/// the flush step. Drawing primitives and `fill` mark the buffer dirty; the
/// raw `put` and span writers leave that to their caller.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    words: Vec<PackedColor>,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            words: vec![0; width * height],
            dirty: false,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn words(&self) -> &[PackedColor] {
        &self.words
    }

    /// Returns true if `(x, y)` lies inside the buffer
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Stored word at `(x, y)`, if inside
    pub fn get(&self, x: i32, y: i32) -> Option<PackedColor> {
        if !self.contains(x, y) {
            return None;
        }
        self.words.get(y as usize * self.width + x as usize).copied()
    }

    /// Write one pixel, silently clipping
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, word: PackedColor) {
        if self.contains(x, y) {
            self.words[y as usize * self.width + x as usize] = word;
        }
    }

    /// Fill the whole buffer
    pub fn fill(&mut self, word: PackedColor) {
        self.words.fill(word);
        self.dirty = true;
    }

    /// Fill the horizontal span `[x0, x1]` of row `y`, clipped
    pub fn hspan(&mut self, y: i32, x0: i32, x1: i32, word: PackedColor) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        if x1 < 0 || x0 as i64 >= self.width as i64 {
            return;
        }
        let xa = x0.max(0) as usize;
        let xb = (x1 as usize).min(self.width - 1);
        let base = y as usize * self.width;
        self.words[base + xa..=base + xb].fill(word);
    }

    /// Fill the vertical span `[y0, y1]` of column `x`, clipped
    pub fn vspan(&mut self, x: i32, y0: i32, y1: i32, word: PackedColor) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        if y1 < 0 || y0 as i64 >= self.height as i64 {
            return;
        }
        let ya = y0.max(0) as usize;
        let yb = (y1 as usize).min(self.height - 1);
        for px in self.words[ya * self.width + x as usize..=yb * self.width + x as usize]
            .iter_mut()
            .step_by(self.width)
        {
            *px = word;
        }
    }

    /// Mutable view of one full row
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [PackedColor] {
        let base = y * self.width;
        &mut self.words[base..base + self.width]
    }

    /// Apply `f` to every stored word
    pub(crate) fn map_words(&mut self, mut f: impl FnMut(PackedColor) -> PackedColor) {
        for word in &mut self.words {
            *word = f(*word);
        }
        self.dirty = true;
    }

    /// Mutable word at linear index `i`
    pub(crate) fn word_mut(&mut self, i: usize) -> Option<&mut PackedColor> {
        self.words.get_mut(i)
    }
}

impl PixelSource for FrameBuffer {
    fn row(&self, y: usize) -> (&[PackedColor], &[PackedColor]) {
        let base = y * self.width;
        (&self.words[base..base + self.width], &[])
    }
}
