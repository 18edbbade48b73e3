//! Panel geometry and the pixel-to-channel mapping table.

use alloc::vec::Vec;

use crate::Error;

/// Corner where the first LED of every panel sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

const ORIGIN_NAME_TOP_LEFT: &str = "top_left";
const ORIGIN_NAME_TOP_RIGHT: &str = "top_right";
const ORIGIN_NAME_BOTTOM_LEFT: &str = "bottom_left";
const ORIGIN_NAME_BOTTOM_RIGHT: &str = "bottom_right";

impl Origin {
    pub fn parse_from_str(s: &str) -> Result<Self, Error> {
        match s {
            ORIGIN_NAME_TOP_LEFT => Ok(Self::TopLeft),
            ORIGIN_NAME_TOP_RIGHT => Ok(Self::TopRight),
            ORIGIN_NAME_BOTTOM_LEFT => Ok(Self::BottomLeft),
            ORIGIN_NAME_BOTTOM_RIGHT => Ok(Self::BottomRight),
            _ => Err(Error::InvalidOrigin),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => ORIGIN_NAME_TOP_LEFT,
            Self::TopRight => ORIGIN_NAME_TOP_RIGHT,
            Self::BottomLeft => ORIGIN_NAME_BOTTOM_LEFT,
            Self::BottomRight => ORIGIN_NAME_BOTTOM_RIGHT,
        }
    }

    const fn is_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight)
    }

    const fn is_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight)
    }
}

/// Physical arrangement of the LED panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub panel_width: u16,
    pub panel_height: u16,
    pub grid_width: u16,
    pub grid_height: u16,
    /// Panels are wired serpentine: odd rows run right-to-left
    pub zigzag: bool,
    pub origin: Origin,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            panel_width: 16,
            panel_height: 16,
            grid_width: 1,
            grid_height: 1,
            zigzag: false,
            origin: Origin::TopLeft,
        }
    }
}

impl PanelGeometry {
    /// Width of the whole display in pixels
    pub const fn width(&self) -> usize {
        self.panel_width as usize * self.grid_width as usize
    }

    /// Height of the whole display in pixels
    pub const fn height(&self) -> usize {
        self.panel_height as usize * self.grid_height as usize
    }

    pub const fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    pub const fn panel_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    pub const fn pixels_per_panel(&self) -> usize {
        self.panel_width as usize * self.panel_height as usize
    }

    /// Panels driven by each of `channels` outputs (rounded up)
    pub const fn panels_per_channel(&self, channels: usize) -> usize {
        self.panel_count().div_ceil(channels)
    }

    /// Check the geometry can be driven by `channels` outputs
    pub fn validate(&self, channels: usize) -> Result<(), Error> {
        if self.panel_width == 0
            || self.panel_height == 0
            || self.grid_width == 0
            || self.grid_height == 0
        {
            return Err(Error::InvalidGeometry);
        }
        let panels = self.panel_count();
        if channels == 0 || channels > panels {
            return Err(Error::ChannelCountMismatch { channels, panels });
        }
        let slots = self.panels_per_channel(channels) * self.pixels_per_panel();
        if slots > usize::from(u16::MAX) + 1 {
            return Err(Error::InvalidGeometry);
        }
        Ok(())
    }

    /// Map one display coordinate to `(channel, slot)`
    ///
    /// The caller guarantees `x < width()` and `y < height()`.
    fn locate(&self, x: usize, y: usize, panels_per_channel: usize) -> (usize, usize) {
        let pw = self.panel_width as usize;
        let ph = self.panel_height as usize;

        let panel_col = x / pw;
        let panel_row = y / ph;
        let panel_id = panel_row * self.grid_width as usize + panel_col;

        let mut lx = x % pw;
        let mut ly = y % ph;
        if self.origin.is_bottom() {
            ly = ph - 1 - ly;
        }
        if self.origin.is_right() {
            lx = pw - 1 - lx;
        }
        if self.zigzag && ly % 2 == 1 {
            lx = pw - 1 - lx;
        }

        let channel = panel_id / panels_per_channel;
        let slot = (panel_id % panels_per_channel) * self.pixels_per_panel() + ly * pw + lx;
        (channel, slot)
    }
}

/// Precomputed framebuffer index to `(channel, slot)` lookup
///
/// Two parallel arrays with one entry per framebuffer pixel, rebuilt
/// whenever the geometry changes.
#[derive(Debug, Clone)]
pub struct PixelMap {
    geometry: PanelGeometry,
    channels: usize,
    slots_per_channel: usize,
    channel: Vec<u8>,
    slot: Vec<u16>,
}

impl PixelMap {
    /// Build the table for `channels` outputs
    pub fn build(geometry: PanelGeometry, channels: usize) -> Result<Self, Error> {
        geometry.validate(channels)?;

        let width = geometry.width();
        let height = geometry.height();
        let panels_per_channel = geometry.panels_per_channel(channels);

        let mut channel = Vec::with_capacity(width * height);
        let mut slot = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (ch, idx) = geometry.locate(x, y, panels_per_channel);
                channel.push(ch as u8);
                slot.push(idx as u16);
            }
        }

        Ok(Self {
            geometry,
            channels,
            slots_per_channel: panels_per_channel * geometry.pixels_per_panel(),
            channel,
            slot,
        })
    }

    pub const fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Length of each channel's transmit buffer
    pub const fn slots_per_channel(&self) -> usize {
        self.slots_per_channel
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// `(channel, slot)` of framebuffer index `i`
    pub fn get(&self, i: usize) -> Option<(usize, usize)> {
        let ch = *self.channel.get(i)?;
        let slot = *self.slot.get(i)?;
        Some((usize::from(ch), usize::from(slot)))
    }

    /// `(channel, slot)` of display coordinate `(x, y)`
    pub fn locate(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        if x >= self.geometry.width() || y >= self.geometry.height() {
            return None;
        }
        self.get(y * self.geometry.width() + x)
    }

    pub(crate) fn channel_table(&self) -> &[u8] {
        &self.channel
    }

    pub(crate) fn slot_table(&self) -> &[u16] {
        &self.slot
    }
}
