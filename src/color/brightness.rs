//! Brightness lookup and GRB word packing
//!
//! Every color that reaches the framebuffer is scaled through a 256-entry
//! table and packed into the word layout the bit sequencer shifts out:
//! `G[31:24] R[23:16] B[15:8]`, MSB first, low byte unused.

use crate::color::Rgb;
use crate::math8::scale8;

/// A brightness-scaled pixel word, ready for the transmit buffers.
pub type PackedColor = u32;

/// Pack already-scaled components into a sequencer word.
#[inline]
pub const fn pack_grb(r: u8, g: u8, b: u8) -> PackedColor {
    ((g as u32) << 24) | ((r as u32) << 16) | ((b as u32) << 8)
}

/// Split a sequencer word back into its components.
#[inline]
pub const fn unpack_grb(word: PackedColor) -> Rgb {
    Rgb {
        r: (word >> 16) as u8,
        g: (word >> 24) as u8,
        b: (word >> 8) as u8,
    }
}

/// Linear brightness table
///
/// `table[i] = round(i * brightness)`, monotonic and bounded to 0-255.
#[derive(Clone)]
pub struct BrightnessTable {
    level: f32,
    table: [u8; 256],
}

impl core::fmt::Debug for BrightnessTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BrightnessTable")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl BrightnessTable {
    /// Build a table for the given level, clamped to 0.0-1.0.
    pub fn new(level: f32) -> Self {
        let mut table = Self {
            level: 0.0,
            table: [0; 256],
        };
        table.set_level(level);
        table
    }

    /// Current brightness level (0.0-1.0)
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Recompute the table for a new level
    ///
    /// NaN is treated as zero.
    pub fn set_level(&mut self, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.level = level;
        for (i, entry) in self.table.iter_mut().enumerate() {
            *entry = (i as f32 * level + 0.5) as u8;
        }
    }

    /// Scale one component
    #[inline]
    pub const fn scale(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    /// Scale and pack a color
    #[inline]
    pub const fn pack(&self, color: Rgb) -> PackedColor {
        pack_grb(self.scale(color.r), self.scale(color.g), self.scale(color.b))
    }
}

/// Fade a packed word by an 8-bit factor without unpacking brightness.
///
/// Scaling is linear, so fading a stored word is the same as fading the
/// source color before packing.
#[inline]
pub(crate) const fn fade_word(word: PackedColor, factor: u8) -> PackedColor {
    let c = unpack_grb(word);
    pack_grb(scale8(c.r, factor), scale8(c.g, factor), scale8(c.b, factor))
}
