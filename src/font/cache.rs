//! Bounded glyph margin cache.

use heapless::Deque;

use super::{Glyph, GlyphMargins};

/// Number of glyphs whose margins are remembered
pub const MARGIN_CACHE_SIZE: usize = 64;

/// Fixed-capacity memo of per-glyph ink margins
///
/// Keyed by glyph offset. When full, the oldest entry is evicted; a miss
/// only costs a rescan of the glyph.
#[derive(Debug, Default)]
pub(crate) struct MarginCache {
    entries: Deque<(Glyph, GlyphMargins), MARGIN_CACHE_SIZE>,
}

impl MarginCache {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    pub(crate) fn get(&self, glyph: Glyph) -> Option<GlyphMargins> {
        self.entries
            .iter()
            .find(|(key, _)| *key == glyph)
            .map(|&(_, margins)| margins)
    }

    pub(crate) fn insert(&mut self, glyph: Glyph, margins: GlyphMargins) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        let _ = self.entries.push_back((glyph, margins));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
