//! Matrix effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid dynamic dispatch.
//! Each effect implements the `Effect` trait and draws straight into the
//! framebuffer; colors are packed through the matrix brightness table.

mod campfire;
mod fireworks;
mod meteor;
mod plasma;
mod rng;
mod sparkle;

use embassy_time::{Duration, Instant};

pub use campfire::CampfireEffect;
pub use fireworks::FireworksEffect;
pub use meteor::MeteorRainEffect;
pub use plasma::{PlasmaEffect, WaveRgbEffect};
pub use rng::SplitMix;
pub use sparkle::SparkleEffect;

use crate::Error;
use crate::color::BrightnessTable;
use crate::framebuffer::FrameBuffer;

const EFFECT_NAME_SPARKLE: &str = "sparkle";
const EFFECT_NAME_METEOR_RAIN: &str = "meteor_rain";
const EFFECT_NAME_PLASMA: &str = "plasma";
const EFFECT_NAME_FIREWORKS: &str = "fireworks";
const EFFECT_NAME_CAMPFIRE: &str = "campfire";
const EFFECT_NAME_WAVE_RGB: &str = "wave_rgb";

const EFFECT_ID_SPARKLE: u8 = 0;
const EFFECT_ID_METEOR_RAIN: u8 = 1;
const EFFECT_ID_PLASMA: u8 = 2;
const EFFECT_ID_FIREWORKS: u8 = 3;
const EFFECT_ID_CAMPFIRE: u8 = 4;
const EFFECT_ID_WAVE_RGB: u8 = 5;

pub trait Effect {
    /// Interval between frames the effect is tuned for
    fn period(&self) -> Duration;

    /// Render a single frame into `frame`
    fn render(&mut self, now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable);

    /// Reset effect state
    fn reset(&mut self) {}
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Random twinkles over a decaying base
    Sparkle(SparkleEffect),
    /// Comets running along the pixel index with fading tails
    MeteorRain(MeteorRainEffect),
    /// Two-axis sine plasma through the color wheel
    Plasma(PlasmaEffect),
    /// Bursts of sparks from a random center
    Fireworks(FireworksEffect),
    /// Heat diffusion mapped to flame colors
    Campfire(CampfireEffect),
    /// Phase-shifted sine waves on R, G and B
    WaveRgb(WaveRgbEffect),
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Sparkle = EFFECT_ID_SPARKLE,
    MeteorRain = EFFECT_ID_METEOR_RAIN,
    Plasma = EFFECT_ID_PLASMA,
    Fireworks = EFFECT_ID_FIREWORKS,
    Campfire = EFFECT_ID_CAMPFIRE,
    WaveRgb = EFFECT_ID_WAVE_RGB,
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self::Plasma(PlasmaEffect::default())
    }
}

impl EffectId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_SPARKLE => Self::Sparkle,
            EFFECT_ID_METEOR_RAIN => Self::MeteorRain,
            EFFECT_ID_PLASMA => Self::Plasma,
            EFFECT_ID_FIREWORKS => Self::Fireworks,
            EFFECT_ID_CAMPFIRE => Self::Campfire,
            EFFECT_ID_WAVE_RGB => Self::WaveRgb,
            _ => return None,
        })
    }

    /// Default-configured effect; `seed` drives the random ones
    pub fn to_slot(self, seed: u64) -> EffectSlot {
        match self {
            Self::Sparkle => EffectSlot::Sparkle(SparkleEffect::default().with_seed(seed)),
            Self::MeteorRain => EffectSlot::MeteorRain(MeteorRainEffect::default().with_seed(seed)),
            Self::Plasma => EffectSlot::Plasma(PlasmaEffect::default()),
            Self::Fireworks => EffectSlot::Fireworks(FireworksEffect::default().with_seed(seed)),
            Self::Campfire => EffectSlot::Campfire(CampfireEffect::default().with_seed(seed)),
            Self::WaveRgb => EffectSlot::WaveRgb(WaveRgbEffect::default()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sparkle => EFFECT_NAME_SPARKLE,
            Self::MeteorRain => EFFECT_NAME_METEOR_RAIN,
            Self::Plasma => EFFECT_NAME_PLASMA,
            Self::Fireworks => EFFECT_NAME_FIREWORKS,
            Self::Campfire => EFFECT_NAME_CAMPFIRE,
            Self::WaveRgb => EFFECT_NAME_WAVE_RGB,
        }
    }

    pub fn parse_from_str(s: &str) -> Result<Self, Error> {
        match s {
            EFFECT_NAME_SPARKLE => Ok(Self::Sparkle),
            EFFECT_NAME_METEOR_RAIN => Ok(Self::MeteorRain),
            EFFECT_NAME_PLASMA => Ok(Self::Plasma),
            EFFECT_NAME_FIREWORKS => Ok(Self::Fireworks),
            EFFECT_NAME_CAMPFIRE => Ok(Self::Campfire),
            EFFECT_NAME_WAVE_RGB => Ok(Self::WaveRgb),
            _ => Err(Error::UnknownEffect),
        }
    }
}

impl EffectSlot {
    /// Frame period of the current effect
    pub fn period(&self) -> Duration {
        match self {
            Self::Sparkle(effect) => effect.period(),
            Self::MeteorRain(effect) => effect.period(),
            Self::Plasma(effect) => effect.period(),
            Self::Fireworks(effect) => effect.period(),
            Self::Campfire(effect) => effect.period(),
            Self::WaveRgb(effect) => effect.period(),
        }
    }

    /// Render the current effect
    pub fn render(&mut self, now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        match self {
            Self::Sparkle(effect) => effect.render(now, frame, table),
            Self::MeteorRain(effect) => effect.render(now, frame, table),
            Self::Plasma(effect) => effect.render(now, frame, table),
            Self::Fireworks(effect) => effect.render(now, frame, table),
            Self::Campfire(effect) => effect.render(now, frame, table),
            Self::WaveRgb(effect) => effect.render(now, frame, table),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Sparkle(effect) => Effect::reset(effect),
            Self::MeteorRain(effect) => Effect::reset(effect),
            Self::Plasma(effect) => Effect::reset(effect),
            Self::Fireworks(effect) => Effect::reset(effect),
            Self::Campfire(effect) => Effect::reset(effect),
            Self::WaveRgb(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Sparkle(_) => EffectId::Sparkle,
            Self::MeteorRain(_) => EffectId::MeteorRain,
            Self::Plasma(_) => EffectId::Plasma,
            Self::Fireworks(_) => EffectId::Fireworks,
            Self::Campfire(_) => EffectId::Campfire,
            Self::WaveRgb(_) => EffectId::WaveRgb,
        }
    }
}

impl Effect for EffectSlot {
    fn period(&self) -> Duration {
        EffectSlot::period(self)
    }

    fn render(&mut self, now: Instant, frame: &mut FrameBuffer, table: &BrightnessTable) {
        EffectSlot::render(self, now, frame, table);
    }

    fn reset(&mut self) {
        EffectSlot::reset(self);
    }
}
