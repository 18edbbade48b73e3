//! Fireworks effect
//!
//! A burst of sparks leaves a random pixel in both directions along the
//! pixel index. Trails fade each frame; a new burst starts every
//! `BURST_FRAMES` frames.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::{Effect, SplitMix};
use crate::color::{BrightnessTable, Rgb, fade_word};
use crate::framebuffer::FrameBuffer;
use crate::math8::unit_to_scale8;

const DEFAULT_PERIOD_MS: u64 = 30;
const DEFAULT_SPARKS: usize = 24;
const BURST_FRAMES: u8 = 25;
/// Upper bound on sparks per burst
pub const MAX_SPARKS: usize = 64;
const MAX_COLORS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Spark {
    pos: usize,
    velocity: isize,
    color: Rgb,
}

#[derive(Debug, Clone)]
pub struct FireworksEffect {
    colors: Vec<Rgb, MAX_COLORS>,
    sparks: usize,
    fade: u8,
    particles: Vec<Spark, MAX_SPARKS>,
    age: u8,
    rng: SplitMix,
}

impl Default for FireworksEffect {
    fn default() -> Self {
        let mut colors = Vec::new();
        let _ = colors.push(Rgb { r: 255, g: 128, b: 0 });
        let _ = colors.push(Rgb { r: 255, g: 255, b: 255 });
        let _ = colors.push(Rgb { r: 0, g: 255, b: 255 });
        Self {
            colors,
            sparks: DEFAULT_SPARKS,
            fade: unit_to_scale8(0.9),
            particles: Vec::new(),
            age: 0,
            rng: SplitMix::new(0),
        }
    }
}

impl FireworksEffect {
    #[must_use]
    pub fn with_colors(mut self, colors: &[Rgb]) -> Self {
        if !colors.is_empty() {
            self.colors = colors.iter().copied().take(MAX_COLORS).collect();
        }
        self
    }

    /// Sparks per burst, capped at [`MAX_SPARKS`]
    #[must_use]
    pub fn with_sparks(mut self, sparks: usize) -> Self {
        self.sparks = sparks.min(MAX_SPARKS);
        self
    }

    /// Fraction of brightness kept per frame (0.0-1.0)
    #[must_use]
    pub fn with_fade(mut self, fade: f32) -> Self {
        self.fade = unit_to_scale8(fade);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SplitMix::new(seed);
        self
    }

    fn burst(&mut self, pixels: usize) {
        self.particles.clear();
        let center = self.rng.below(pixels);
        for _ in 0..self.sparks {
            let speed = (self.rng.bits(3) % 5 + 1) as isize;
            let velocity = if self.rng.coin() { speed } else { -speed };
            let color = self.colors[self.rng.below(self.colors.len())];
            let _ = self.particles.push(Spark {
                pos: center,
                velocity,
                color,
            });
        }
        self.age = 0;
    }
}

impl Effect for FireworksEffect {
    fn period(&self) -> Duration {
        Duration::from_millis(DEFAULT_PERIOD_MS)
    }

    fn render(&mut self, _now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        let pixels = frame.words().len();
        if pixels == 0 {
            return;
        }
        if self.particles.is_empty() || self.age > BURST_FRAMES {
            self.burst(pixels);
        }

        let fade = self.fade;
        frame.map_words(|word| fade_word(word, fade));

        for spark in &mut self.particles {
            let pos = (spark.pos as isize + spark.velocity).rem_euclid(pixels as isize) as usize;
            spark.pos = pos;
            if let Some(px) = frame.word_mut(pos) {
                *px = table.pack(spark.color);
            }
        }
        self.age = self.age.saturating_add(1);
    }

    fn reset(&mut self) {
        self.particles.clear();
        self.age = 0;
    }
}
