//! Bitmap fonts and glyph metrics
//!
//! A font is a read-only blob of fixed-size glyph bitmaps, `height` rows of
//! `bytes_per_row` bytes each, MSB = leftmost column. Glyphs are found
//! either by a dense code range or by a sorted sparse code table.

mod cache;

pub use cache::MARGIN_CACHE_SIZE;
use cache::MarginCache;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Error;

const DEFAULT_FALLBACK: u32 = '?' as u32;
const MAX_FONT_WIDTH: u8 = 32;

/// How code points are located in the glyph data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphLayout {
    /// Consecutive glyphs for `first..=last`
    Dense { first: u32, last: u32 },
    /// `codes` sorted ascending, `offsets[i]` is the byte offset of `codes[i]`
    Sparse {
        codes: &'static [u32],
        offsets: &'static [u32],
    },
}

/// Structured font resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontDescriptor {
    pub data: &'static [u8],
    pub width: u8,
    pub height: u8,
    pub bytes_per_row: u8,
    /// Bytes between consecutive glyphs in a dense layout
    pub glyph_span: u32,
    /// Code point drawn for characters the font lacks
    pub fallback: u32,
    pub layout: GlyphLayout,
}

impl FontDescriptor {
    /// Dense font covering `first..=last` with packed rows
    pub const fn dense(data: &'static [u8], width: u8, height: u8, first: u32, last: u32) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            data,
            width,
            height,
            bytes_per_row,
            glyph_span: bytes_per_row as u32 * height as u32,
            fallback: DEFAULT_FALLBACK,
            layout: GlyphLayout::Dense { first, last },
        }
    }

    /// Sparse font addressed through a sorted code table
    pub const fn sparse(
        data: &'static [u8],
        width: u8,
        height: u8,
        codes: &'static [u32],
        offsets: &'static [u32],
    ) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            data,
            width,
            height,
            bytes_per_row,
            glyph_span: bytes_per_row as u32 * height as u32,
            fallback: DEFAULT_FALLBACK,
            layout: GlyphLayout::Sparse { codes, offsets },
        }
    }

    #[must_use]
    pub const fn with_fallback(mut self, fallback: char) -> Self {
        self.fallback = fallback as u32;
        self
    }

    /// Override the row stride; the glyph span follows unless set later
    #[must_use]
    pub const fn with_bytes_per_row(mut self, bytes_per_row: u8) -> Self {
        self.bytes_per_row = bytes_per_row;
        self.glyph_span = bytes_per_row as u32 * self.height as u32;
        self
    }

    #[must_use]
    pub const fn with_glyph_span(mut self, glyph_span: u32) -> Self {
        self.glyph_span = glyph_span;
        self
    }

    const fn glyph_bytes(&self) -> usize {
        self.bytes_per_row as usize * self.height as usize
    }

    /// Check every glyph the descriptor can address lies inside `data`
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0
            || self.width > MAX_FONT_WIDTH
            || self.height == 0
            || self.bytes_per_row < self.width.div_ceil(8)
            || self.bytes_per_row > 4
            || (self.glyph_span as usize) < self.glyph_bytes()
        {
            return Err(Error::InvalidFont);
        }

        match self.layout {
            GlyphLayout::Dense { first, last } => {
                if first > last {
                    return Err(Error::InvalidFont);
                }
                let glyphs = (last - first) as usize;
                let needed = glyphs * self.glyph_span as usize + self.glyph_bytes();
                if self.data.len() < needed {
                    return Err(Error::InvalidFont);
                }
            }
            GlyphLayout::Sparse { codes, offsets } => {
                if codes.len() != offsets.len() || codes.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(Error::InvalidFont);
                }
                if offsets
                    .iter()
                    .any(|&off| off as usize + self.glyph_bytes() > self.data.len())
                {
                    return Err(Error::InvalidFont);
                }
            }
        }
        Ok(())
    }
}

/// Resource loader returning font descriptors by name
pub trait FontLoader {
    fn load(&mut self, name: &str) -> Result<FontDescriptor, Error>;

    /// Called when the display stops using a font
    fn unload(&mut self, _font: &FontDescriptor) {}
}

/// Loader over a fixed table of fonts linked into the firmware
#[derive(Debug, Clone)]
pub struct StaticFontLoader<const N: usize> {
    fonts: [(&'static str, FontDescriptor); N],
}

impl<const N: usize> StaticFontLoader<N> {
    pub const fn new(fonts: [(&'static str, FontDescriptor); N]) -> Self {
        Self { fonts }
    }
}

impl<const N: usize> FontLoader for StaticFontLoader<N> {
    fn load(&mut self, name: &str) -> Result<FontDescriptor, Error> {
        self.fonts
            .iter()
            .find(|(font_name, _)| *font_name == name)
            .map(|&(_, font)| font)
            .ok_or(Error::UnknownFont)
    }
}

/// Resolved glyph: a byte offset into the font data, or the blank glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Bitmap(u32),
    /// Zero-ink glyph used when even the fallback is missing
    Blank,
}

/// Blank columns at each side of a glyph
///
/// A glyph without ink reports `font_width` on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMargins {
    pub left: u8,
    pub right: u8,
}

/// Spacing of one character under a text style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharMetrics {
    /// `None` for spaces
    pub glyph: Option<Glyph>,
    /// First inked column inside the glyph
    pub ink_left: i32,
    /// Inked columns, `<= 0` when the glyph is blank
    pub ink_width: i32,
    /// Pixels the pen moves
    pub advance: i32,
}

impl CharMetrics {
    pub const fn has_ink(&self) -> bool {
        self.glyph.is_some() && self.ink_width > 0
    }

    /// Last inked column inside the glyph
    pub const fn ink_right(&self) -> i32 {
        self.ink_left + self.ink_width - 1
    }
}

/// Font in use by a display, with its margin cache
#[derive(Debug)]
pub struct Font {
    desc: FontDescriptor,
    margins: MarginCache,
}

impl Font {
    pub fn new(desc: FontDescriptor) -> Result<Self, Error> {
        desc.validate()?;
        #[cfg(feature = "esp32-log")]
        println!(
            "[Font.new] {}x{} font, {} bytes",
            desc.width,
            desc.height,
            desc.data.len()
        );
        Ok(Self {
            desc,
            margins: MarginCache::new(),
        })
    }

    pub const fn descriptor(&self) -> &FontDescriptor {
        &self.desc
    }

    pub const fn width(&self) -> usize {
        self.desc.width as usize
    }

    pub const fn height(&self) -> usize {
        self.desc.height as usize
    }

    /// Number of cached margin entries
    pub fn cached_glyphs(&self) -> usize {
        self.margins.len()
    }

    /// Resolve a character to its glyph; never fails
    pub fn glyph(&self, ch: char) -> Glyph {
        let code = ch as u32;
        match self.desc.layout {
            GlyphLayout::Dense { first, last } => {
                let mut code = code;
                if code < first || code > last {
                    code = self.desc.fallback;
                    if code < first || code > last {
                        code = first;
                    }
                }
                Glyph::Bitmap((code - first) * self.desc.glyph_span)
            }
            GlyphLayout::Sparse { codes, offsets } => {
                let find = |code: u32| {
                    codes
                        .binary_search(&code)
                        .ok()
                        .and_then(|i| offsets.get(i).copied())
                };
                find(code)
                    .or_else(|| find(self.desc.fallback))
                    .map_or(Glyph::Blank, Glyph::Bitmap)
            }
        }
    }

    /// Row `row` of a glyph as a `width`-bit pattern, MSB = column 0
    pub fn row_bits(&self, glyph: Glyph, row: usize) -> u32 {
        let Glyph::Bitmap(offset) = glyph else {
            return 0;
        };
        let bpr = self.desc.bytes_per_row as usize;
        let base = offset as usize + row * bpr;
        let mut bits: u32 = 0;
        for i in 0..bpr {
            let byte = self.desc.data.get(base + i).copied().unwrap_or(0);
            bits = (bits << 8) | u32::from(byte);
        }
        let shift = bpr * 8 - self.width();
        let mask = if self.width() >= 32 {
            u32::MAX
        } else {
            (1 << self.width()) - 1
        };
        (bits >> shift) & mask
    }

    /// Returns true if column `col` of `row_bits` is inked
    #[inline]
    pub fn bit(&self, row_bits: u32, col: usize) -> bool {
        (row_bits >> (self.width() - 1 - col)) & 1 != 0
    }

    /// Blank columns at each side of the glyph, memoized per offset
    pub fn ink_margins(&mut self, glyph: Glyph) -> GlyphMargins {
        if let Some(margins) = self.margins.get(glyph) {
            return margins;
        }
        let margins = self.scan_margins(glyph);
        self.margins.insert(glyph, margins);
        margins
    }

    fn scan_margins(&self, glyph: Glyph) -> GlyphMargins {
        let fw = self.width() as u32;
        let ink = (0..self.height()).fold(0u32, |acc, row| acc | self.row_bits(glyph, row));
        if ink == 0 {
            return GlyphMargins {
                left: fw as u8,
                right: fw as u8,
            };
        }
        GlyphMargins {
            left: (ink.leading_zeros() - (32 - fw)) as u8,
            right: ink.trailing_zeros() as u8,
        }
    }

    /// Spacing of `ch` with the given margins and space scale
    pub fn metrics(&mut self, ch: char, left_margin: i32, right_margin: i32, space_scale: f32) -> CharMetrics {
        if ch == ' ' {
            return CharMetrics {
                glyph: None,
                ink_left: 0,
                ink_width: 0,
                advance: self.space_advance(space_scale),
            };
        }
        let glyph = self.glyph(ch);
        let margins = self.ink_margins(glyph);
        let ink_width = self.width() as i32 - i32::from(margins.left) - i32::from(margins.right);
        let advance = if ink_width <= 0 {
            left_margin.saturating_add(right_margin)
        } else {
            left_margin.saturating_add(ink_width).saturating_add(right_margin)
        };
        CharMetrics {
            glyph: Some(glyph),
            ink_left: i32::from(margins.left),
            ink_width,
            advance,
        }
    }

    /// Width of a space: `round(font_width * space_scale)`
    pub fn space_advance(&self, space_scale: f32) -> i32 {
        libm::roundf(self.width() as f32 * space_scale) as i32
    }
}
