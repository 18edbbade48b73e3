//! Meteor rain effect
//!
//! A few meteors run along the pixel index at their own speed, each leaving
//! a tail that fades by `decay` per frame.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::{Effect, SplitMix};
use crate::color::{BrightnessTable, Rgb, fade_word};
use crate::framebuffer::FrameBuffer;
use crate::math8::unit_to_scale8;

const DEFAULT_PERIOD_MS: u64 = 40;
const DEFAULT_COUNT: usize = 3;
/// Upper bound on simultaneous meteors
pub const MAX_METEORS: usize = 16;
/// Upper bound on the meteor palette
pub const MAX_METEOR_COLORS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Meteor {
    pos: usize,
    speed: usize,
    color: Rgb,
}

#[derive(Debug, Clone)]
pub struct MeteorRainEffect {
    colors: Vec<Rgb, MAX_METEOR_COLORS>,
    count: usize,
    decay: u8,
    meteors: Vec<Meteor, MAX_METEORS>,
    rng: SplitMix,
}

impl Default for MeteorRainEffect {
    fn default() -> Self {
        let mut colors = Vec::new();
        let _ = colors.push(Rgb { r: 255, g: 0, b: 0 });
        let _ = colors.push(Rgb { r: 0, g: 0, b: 255 });
        Self {
            colors,
            count: DEFAULT_COUNT,
            decay: unit_to_scale8(0.8),
            meteors: Vec::new(),
            rng: SplitMix::new(0),
        }
    }
}

impl MeteorRainEffect {
    /// Palette meteors pick from; extra colors beyond the capacity are
    /// ignored, an empty slice keeps the current palette
    #[must_use]
    pub fn with_colors(mut self, colors: &[Rgb]) -> Self {
        if !colors.is_empty() {
            self.colors = colors.iter().copied().take(MAX_METEOR_COLORS).collect();
        }
        self
    }

    /// Number of meteors, capped at [`MAX_METEORS`]
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.min(MAX_METEORS);
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

    fn spawn(&mut self, pixels: usize) {
        self.meteors.clear();
        for _ in 0..self.count {
            let meteor = Meteor {
                pos: self.rng.below(pixels),
                speed: 1 + self.rng.bits(2) as usize,
                color: self.colors[self.rng.below(self.colors.len())],
            };
            let _ = self.meteors.push(meteor);
        }
    }
}

impl Effect for MeteorRainEffect {
    fn period(&self) -> Duration {
        Duration::from_millis(DEFAULT_PERIOD_MS)
    }

    fn render(&mut self, _now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        let pixels = frame.words().len();
        if pixels == 0 {
            return;
        }
        if self.meteors.len() != self.count {
            self.spawn(pixels);
        }

        let decay = self.decay;
        frame.map_words(|word| fade_word(word, decay));

        for meteor in &mut self.meteors {
            let pos = meteor.pos % pixels;
            if let Some(px) = frame.word_mut(pos) {
                *px = table.pack(meteor.color);
            }
            meteor.pos = (pos + meteor.speed) % pixels;
        }
    }

    fn reset(&mut self) {
        self.meteors.clear();
    }
}
