//! Sparkle effect
//!
//! Every frame the whole matrix fades by `decay`, and with probability
//! `density` one random pixel lights up in the sparkle color.

use embassy_time::{Duration, Instant};

use super::{Effect, SplitMix};
use crate::color::{BLACK, BrightnessTable, Rgb, WHITE, fade_word};
use crate::framebuffer::FrameBuffer;
use crate::math8::unit_to_scale8;

const DEFAULT_PERIOD_MS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SparkleEffect {
    base: Rgb,
    color: Rgb,
    /// Chance per frame, 16-bit fixed point
    threshold: u32,
    decay: u8,
    rng: SplitMix,
    primed: bool,
}

impl Default for SparkleEffect {
    fn default() -> Self {
        Self {
            base: BLACK,
            color: WHITE,
            threshold: density_threshold(0.1),
            decay: unit_to_scale8(0.9),
            rng: SplitMix::new(0),
            primed: false,
        }
    }
}

/// Probability as a 16-bit threshold
fn density_threshold(density: f32) -> u32 {
    (65535.0 * density.clamp(0.0, 1.0)) as u32
}

impl SparkleEffect {
    /// Background painted once when the effect starts
    #[must_use]
    pub fn with_base(mut self, base: Rgb) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Chance (0.0-1.0) that a new sparkle appears in a frame
    #[must_use]
    pub fn with_density(mut self, density: f32) -> Self {
        self.threshold = density_threshold(density);
        self
    }

    /// Fraction of brightness kept per frame (0.0-1.0)
    #[must_use]
    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = unit_to_scale8(decay);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SplitMix::new(seed);
        self
    }
}

impl Effect for SparkleEffect {
    fn period(&self) -> Duration {
        Duration::from_millis(DEFAULT_PERIOD_MS)
    }

    fn render(&mut self, _now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        if !self.primed {
            frame.fill(table.pack(self.base));
            self.primed = true;
        }
        let decay = self.decay;
        frame.map_words(|word| fade_word(word, decay));

        if self.rng.bits(16) < self.threshold {
            let n = frame.words().len();
            let idx = self.rng.below(n);
            if let Some(px) = frame.word_mut(idx) {
                *px = table.pack(self.color);
            }
        }
    }

    fn reset(&mut self) {
        self.primed = false;
    }
}
