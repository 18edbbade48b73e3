//! Plasma and RGB wave effects
//!
//! Both are pure functions of a phase counter advanced once per frame.

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::color::{BrightnessTable, Rgb, wheel};
use crate::framebuffer::FrameBuffer;

const PLASMA_PERIOD_MS: u64 = 50;
const WAVE_PERIOD_MS: u64 = 100;
/// Degrees the wave phase moves per frame
const WAVE_STEP_DEG: u16 = 5;

/// Sum of a horizontal and a vertical sine, mapped through the color wheel
#[derive(Debug, Clone)]
pub struct PlasmaEffect {
    phase: f32,
    hue_shift: f32,
}

impl Default for PlasmaEffect {
    fn default() -> Self {
        Self {
            phase: 0.0,
            hue_shift: 2.0,
        }
    }
}

impl PlasmaEffect {
    /// Phase advance per frame
    #[must_use]
    pub fn with_hue_shift(mut self, hue_shift: f32) -> Self {
        self.hue_shift = hue_shift;
        self
    }
}

impl Effect for PlasmaEffect {
    fn period(&self) -> Duration {
        Duration::from_millis(PLASMA_PERIOD_MS)
    }

    fn render(&mut self, _now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        let t = self.phase;
        for y in 0..frame.height() {
            let sy = libm::sinf(y as f32 * 0.5 + t);
            for (x, px) in frame.row_mut(y).iter_mut().enumerate() {
                let value = (libm::sinf(x as f32 * 0.5 + t) + sy) * 180.0 + t;
                *px = table.pack(wheel((value as i32 & 0xFF) as u8));
            }
        }
        frame.mark_dirty();
        self.phase += self.hue_shift;
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Three sines 120 degrees apart drive R, G and B along the pixel index
#[derive(Debug, Clone, Default)]
pub struct WaveRgbEffect {
    step: u16,
}

/// `(sin(deg) + 1) / 2` scaled to a component
fn wave_component(deg: f32) -> u8 {
    ((libm::sinf(deg.to_radians()) + 1.0) / 2.0 * 255.0) as u8
}

impl Effect for WaveRgbEffect {
    fn period(&self) -> Duration {
        Duration::from_millis(WAVE_PERIOD_MS)
    }

    fn render(&mut self, _now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        let pixels = frame.words().len();
        if pixels == 0 {
            return;
        }
        let step = f32::from(self.step);
        let spread = 360.0 / pixels as f32;
        for i in 0..pixels {
            let base = step + i as f32 * spread;
            let color = Rgb {
                r: wave_component(base),
                g: wave_component(base + 120.0),
                b: wave_component(base + 240.0),
            };
            if let Some(px) = frame.word_mut(i) {
                *px = table.pack(color);
            }
        }
        frame.mark_dirty();
        self.step = (self.step + WAVE_STEP_DEG) % 360;
    }

    fn reset(&mut self) {
        self.step = 0;
    }
}
