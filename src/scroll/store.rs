//! Wrap-around stores backing the scrolling engine.
//!
//! Both stores are addressed by "lanes" along the scroll axis: columns of the
//! ring buffer, rows of the virtual buffer. Lane positions are always taken
//! modulo the store's span.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::PackedColor;
use crate::framebuffer::PixelSource;

/// Store whose visible window slides along one axis
pub(crate) trait WrapStore: PixelSource {
    /// Number of lanes before wrapping
    fn span(&self) -> usize;

    /// Visible lanes
    fn window(&self) -> usize;

    fn head(&self) -> usize;

    fn set_head(&mut self, head: usize);

    /// Fill one lane across the whole store
    fn clear_lane(&mut self, lane: usize, word: PackedColor);

    /// Fill every lane and re-home the window
    fn reset(&mut self, word: PackedColor);

    /// Fill `count` lanes starting at `start`, wrapping
    fn clear_lanes(&mut self, start: isize, count: usize, word: PackedColor) {
        for i in 0..count {
            let lane = wrap(start + i as isize, self.span());
            self.clear_lane(lane, word);
        }
    }
}

/// `pos` folded into `[0, span)`
#[inline]
pub(crate) fn wrap(pos: isize, span: usize) -> usize {
    pos.rem_euclid(span as isize) as usize
}

/// Horizontal ring: `rows` rows of `width` columns, window `window` wide
#[derive(Debug, Default)]
pub(crate) struct RingBuffer {
    width: usize,
    rows: usize,
    window: usize,
    head: usize,
    words: Vec<PackedColor>,
}

impl RingBuffer {
    /// Make room for a `window` x `rows` display plus `spare` columns
    ///
    /// Capacity only grows; a smaller request keeps the current allocation.
    pub(crate) fn ensure(&mut self, window: usize, rows: usize, spare: usize) {
        let width = (window + spare).max(self.width);
        if width != self.width || rows != self.rows || window != self.window {
            self.width = width;
            self.rows = rows;
            self.window = window;
            self.words = vec![0; width * rows];
            self.head = 0;
        }
    }

    /// Write one word at lane `col`, row `row`; rows outside the store clip
    #[inline]
    pub(crate) fn put(&mut self, col: isize, row: usize, word: PackedColor) {
        if row < self.rows {
            let col = wrap(col, self.width);
            self.words[row * self.width + col] = word;
        }
    }
}

impl PixelSource for RingBuffer {
    fn row(&self, y: usize) -> (&[PackedColor], &[PackedColor]) {
        let base = y * self.width;
        let first = self.window.min(self.width - self.head);
        let head = &self.words[base + self.head..base + self.head + first];
        let tail = &self.words[base..base + (self.window - first)];
        (head, tail)
    }
}

impl WrapStore for RingBuffer {
    fn span(&self) -> usize {
        self.width
    }

    fn window(&self) -> usize {
        self.window
    }

    fn head(&self) -> usize {
        self.head
    }

    fn set_head(&mut self, head: usize) {
        self.head = head % self.width.max(1);
    }

    fn clear_lane(&mut self, lane: usize, word: PackedColor) {
        for px in self.words[lane..].iter_mut().step_by(self.width) {
            *px = word;
        }
    }

    fn reset(&mut self, word: PackedColor) {
        self.words.fill(word);
        self.head = 0;
    }
}

/// Vertical store: `height` rows of `width` columns, window `window` rows
#[derive(Debug, Default)]
pub(crate) struct VirtualBuffer {
    width: usize,
    height: usize,
    window: usize,
    head: usize,
    words: Vec<PackedColor>,
}

impl VirtualBuffer {
    /// Make room for a `width` x `window` display plus `spare` rows
    ///
    /// Capacity only grows; a smaller request keeps the current allocation.
    pub(crate) fn ensure(&mut self, width: usize, window: usize, spare: usize) {
        let height = (window + spare).max(self.height);
        if height != self.height || width != self.width || window != self.window {
            self.width = width;
            self.height = height;
            self.window = window;
            self.words = vec![0; width * height];
            self.head = 0;
        }
    }

    pub(crate) const fn width(&self) -> usize {
        self.width
    }

    /// Write one word at column `x`, lane `row`; columns outside clip
    #[inline]
    pub(crate) fn put(&mut self, x: usize, row: isize, word: PackedColor) {
        if x < self.width {
            let row = wrap(row, self.height);
            self.words[row * self.width + x] = word;
        }
    }
}

impl PixelSource for VirtualBuffer {
    fn row(&self, y: usize) -> (&[PackedColor], &[PackedColor]) {
        let base = ((self.head + y) % self.height) * self.width;
        (&self.words[base..base + self.width], &[])
    }
}

impl WrapStore for VirtualBuffer {
    fn span(&self) -> usize {
        self.height
    }

    fn window(&self) -> usize {
        self.window
    }

    fn head(&self) -> usize {
        self.head
    }

    fn set_head(&mut self, head: usize) {
        self.head = head % self.height.max(1);
    }

    fn clear_lane(&mut self, lane: usize, word: PackedColor) {
        let base = lane * self.width;
        self.words[base..base + self.width].fill(word);
    }

    fn reset(&mut self, word: PackedColor) {
        self.words.fill(word);
        self.head = 0;
    }
}
