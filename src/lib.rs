#![no_std]

extern crate alloc;

pub mod cancel;
pub mod color;
pub mod draw;
pub mod driver;
pub mod effect;
pub mod error;
pub mod font;
pub mod frame_scheduler;
pub mod framebuffer;
pub mod layout;
pub mod math8;
pub mod matrix;
pub mod output;
pub mod scroll;
pub mod sequencer;
pub mod shader;
pub mod text;

pub use cancel::CancelToken;
pub use color::{BLACK, BrightnessTable, PackedColor, Rgb, WHITE, rgb_from_components, rgb_from_hex};
pub use draw::{BitmapMode, ShapeStyle};
pub use driver::SmartLedsChannel;
pub use effect::{Effect, EffectId, EffectSlot};
pub use error::Error;
pub use font::{FontDescriptor, FontLoader, GlyphLayout, StaticFontLoader};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use framebuffer::{FrameBuffer, PixelSource};
pub use layout::{Origin, PanelGeometry, PixelMap};
pub use matrix::{Matrix, MatrixConfig};
pub use output::{FrameStatus, Output};
pub use scroll::{Direction, ScrollJob, ScrollOptions, ScrollPhase, ScrollPoll, ScrollReport};
pub use sequencer::ChannelId;
pub use shader::{Foreground, Shader, ShaderInput};
pub use text::TextStyle;

pub use embassy_time::{Duration, Instant};

/// One hardware output: bitstream sequencer plus transfer engine
///
/// Implement this trait to support different hardware platforms.
/// The matrix is generic over this trait.
pub trait OutputChannel {
    /// Returns true while the transfer engine is moving a buffer
    fn is_active(&self) -> bool;

    /// Start streaming `words` (packed GRB, MSB first) to the sequencer
    ///
    /// Only called while [`OutputChannel::is_active`] reports false.
    fn start(&mut self, words: &[PackedColor]);

    /// Disable the sequencer and give the pin back
    fn release(&mut self) {}
}

/// The hardware refused to hand out a pin / channel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimError;

/// Source of output channels, consulted once per `(pin, channel)` pair at
/// construction
pub trait ChannelFactory {
    type Channel: OutputChannel;

    fn claim(&mut self, pin: u8, id: ChannelId) -> Result<Self::Channel, ClaimError>;
}

impl<C, F> ChannelFactory for F
where
    C: OutputChannel,
    F: FnMut(u8, ChannelId) -> Result<C, ClaimError>,
{
    type Channel = C;

    fn claim(&mut self, pin: u8, id: ChannelId) -> Result<C, ClaimError> {
        self(pin, id)
    }
}
