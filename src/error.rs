//! Error type shared by every fallible matrix operation.

use core::fmt;

/// Errors reported by the matrix compositor.
///
/// Everything except [`Error::OutOfBounds`] is a configuration error: it is
/// raised eagerly, at construction or call time, and aborts that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Channel id outside the supported sequencer range.
    InvalidChannelId(u8),
    /// The same channel id was requested twice.
    DuplicateChannel(u8),
    /// No outputs, or more outputs than panels to drive.
    ChannelCountMismatch { channels: usize, panels: usize },
    /// The hardware refused to claim a pin / channel pair.
    ChannelInit { pin: u8, channel: u8 },
    /// Zero-sized panel or grid, or a channel buffer too large to address.
    InvalidGeometry,
    /// Origin name is not one of the four corners.
    InvalidOrigin,
    /// Scroll direction name is not `left`, `right`, `up` or `down`.
    InvalidDirection,
    /// Color component or packed value out of range.
    InvalidColor,
    /// Font descriptor is inconsistent with its glyph data.
    InvalidFont,
    /// Bitmap data is shorter than its declared dimensions.
    InvalidBitmap,
    /// Font loader has no resource with the requested name.
    UnknownFont,
    /// Effect name or id is not known.
    UnknownEffect,
    /// Pixel coordinate outside the framebuffer.
    OutOfBounds { x: i32, y: i32 },
}

impl Error {
    /// Returns true for errors caused by invalid configuration or arguments.
    pub const fn is_configuration(&self) -> bool {
        !matches!(self, Self::OutOfBounds { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannelId(id) => {
                write!(f, "channel id {} out of range (0-11)", id)
            }
            Self::DuplicateChannel(id) => write!(f, "channel id {} used twice", id),
            Self::ChannelCountMismatch { channels, panels } => {
                write!(f, "{} channels cannot drive {} panels", channels, panels)
            }
            Self::ChannelInit { pin, channel } => {
                write!(f, "failed to init pin {} / channel {}", pin, channel)
            }
            Self::InvalidGeometry => write!(f, "invalid panel geometry"),
            Self::InvalidOrigin => {
                write!(f, "origin must be top_left/top_right/bottom_left/bottom_right")
            }
            Self::InvalidDirection => {
                write!(f, "direction must be left/right/up/down")
            }
            Self::InvalidColor => write!(f, "color must be 0-255 per channel or 0x000000-0xFFFFFF"),
            Self::InvalidFont => write!(f, "font descriptor does not match its glyph data"),
            Self::InvalidBitmap => write!(f, "bitmap data shorter than its dimensions"),
            Self::UnknownFont => write!(f, "unknown font"),
            Self::UnknownEffect => write!(f, "unknown effect"),
            Self::OutOfBounds { x, y } => {
                write!(f, "pixel ({}, {}) out of bounds", x, y)
            }
        }
    }
}
