//! Campfire effect
//!
//! One heat cell per pixel. Each frame every cell cools a little, heat
//! drifts towards higher indices, and sparks ignite near index zero. Heat
//! is shown through [`heat_color`].

use alloc::vec;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use super::{Effect, SplitMix};
use crate::color::{BrightnessTable, heat_color};
use crate::framebuffer::FrameBuffer;
use crate::math8::{qadd8, qsub8};

const DEFAULT_PERIOD_MS: u64 = 30;
/// Cells near the origin where sparks may land
const SPARK_ZONE: usize = 3;

#[derive(Debug, Clone)]
pub struct CampfireEffect {
    cooling: u8,
    sparking: u8,
    heat: Vec<u8>,
    rng: SplitMix,
}

impl Default for CampfireEffect {
    fn default() -> Self {
        Self {
            cooling: 55,
            sparking: 120,
            heat: Vec::new(),
            rng: SplitMix::new(0),
        }
    }
}

impl CampfireEffect {
    /// How fast cells lose heat
    #[must_use]
    pub fn with_cooling(mut self, cooling: u8) -> Self {
        self.cooling = cooling;
        self
    }

    /// Chance out of 255 that a spark ignites in a frame
    #[must_use]
    pub fn with_sparking(mut self, sparking: u8) -> Self {
        self.sparking = sparking;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SplitMix::new(seed);
        self
    }

    /// Current heat of every cell
    pub fn heat(&self) -> &[u8] {
        &self.heat
    }
}

impl Effect for CampfireEffect {
    fn period(&self) -> Duration {
        Duration::from_millis(DEFAULT_PERIOD_MS)
    }

    fn render(&mut self, _now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        let cells = frame.words().len();
        if cells == 0 {
            return;
        }
        if self.heat.len() != cells {
            self.heat = vec![0; cells];
        }

        let max_cool = usize::from(self.cooling) * 10 / cells + 2;
        for cell in &mut self.heat {
            let cool = self.rng.below(max_cool) as u8;
            *cell = qsub8(*cell, cool);
        }

        for i in (2..cells).rev() {
            let sum = u16::from(self.heat[i - 1]) + 2 * u16::from(self.heat[i - 2]);
            self.heat[i] = (sum / 3) as u8;
        }

        if self.rng.bits(8) < u32::from(self.sparking) {
            let idx = self.rng.below(SPARK_ZONE.min(cells));
            let boost = 160 + self.rng.below(95) as u8;
            self.heat[idx] = qadd8(self.heat[idx], boost);
        }

        let heat = &self.heat;
        let mut i = 0;
        frame.map_words(|_| {
            let word = table.pack(heat_color(heat[i]));
            i += 1;
            word
        });
    }

    fn reset(&mut self) {
        self.heat.clear();
    }
}
