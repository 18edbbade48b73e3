//! Output streaming pipeline
//!
//! Scatters a pixel source into the per-channel transmit buffers through the
//! mapping table and triggers every channel's transfer engine at once.
//! A transmit buffer is never written while its engine reports active.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;
use heapless::Vec as BoundedVec;

use crate::color::PackedColor;
use crate::framebuffer::PixelSource;
use crate::layout::{PanelGeometry, PixelMap};
use crate::sequencer::{ChannelId, MAX_CHANNELS};
use crate::{ChannelFactory, Error, OutputChannel};

/// Result of a present request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame was handed to the transfer engines
    Presented,
    /// A transfer was still running and the caller asked not to wait
    Dropped,
}

impl FrameStatus {
    pub const fn is_presented(self) -> bool {
        matches!(self, Self::Presented)
    }
}

/// One hardware output: sequencer + transfer engine + transmit buffer
#[derive(Debug)]
struct Lane<C> {
    pin: u8,
    id: ChannelId,
    channel: C,
    tx: Vec<PackedColor>,
}

/// Owner of every channel and the mapping table
#[derive(Debug)]
pub struct Output<C: OutputChannel> {
    lanes: BoundedVec<Lane<C>, MAX_CHANNELS>,
    map: PixelMap,
    released: bool,
}

impl<C: OutputChannel> Output<C> {
    /// Claim one channel per `(pin, channel_id)` pair
    ///
    /// Every id is validated before any hardware is touched. If a claim
    /// fails, channels claimed so far are released before returning.
    pub fn new<F>(factory: &mut F, outputs: &[(u8, u8)], geometry: PanelGeometry) -> Result<Self, Error>
    where
        F: ChannelFactory<Channel = C>,
    {
        let mut ids: BoundedVec<ChannelId, MAX_CHANNELS> = BoundedVec::new();
        for &(_, raw) in outputs {
            let id = ChannelId::new(raw)?;
            if ids.contains(&id) {
                return Err(Error::DuplicateChannel(raw));
            }
            ids.push(id).map_err(|_| Error::InvalidChannelId(raw))?;
        }

        let map = PixelMap::build(geometry, outputs.len())?;
        let buf_len = map.slots_per_channel();

        let mut lanes: BoundedVec<Lane<C>, MAX_CHANNELS> = BoundedVec::new();
        for (&(pin, _), &id) in outputs.iter().zip(ids.iter()) {
            match factory.claim(pin, id) {
                Ok(channel) => {
                    let lane = Lane {
                        pin,
                        id,
                        channel,
                        tx: vec![0; buf_len],
                    };
                    if lanes.push(lane).is_err() {
                        release_all(&mut lanes);
                        return Err(Error::InvalidChannelId(id.raw()));
                    }
                }
                Err(_) => {
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[Output.new] failed to claim pin {} / channel {}, releasing {} channels",
                        pin,
                        id.raw(),
                        lanes.len()
                    );
                    release_all(&mut lanes);
                    return Err(Error::ChannelInit {
                        pin,
                        channel: id.raw(),
                    });
                }
            }
        }

        Ok(Self {
            lanes,
            map,
            released: false,
        })
    }

    pub const fn map(&self) -> &PixelMap {
        &self.map
    }

    pub fn channel_count(&self) -> usize {
        self.lanes.len()
    }

    /// Transmit buffer of channel `index`
    pub fn tx_buffer(&self, index: usize) -> Option<&[PackedColor]> {
        self.lanes.get(index).map(|lane| lane.tx.as_slice())
    }

    /// `(pin, channel id)` of channel `index`
    pub fn channel_info(&self, index: usize) -> Option<(u8, ChannelId)> {
        self.lanes.get(index).map(|lane| (lane.pin, lane.id))
    }

    /// Hardware handle of channel `index`
    pub fn channel(&self, index: usize) -> Option<&C> {
        self.lanes.get(index).map(|lane| &lane.channel)
    }

    /// Returns true while any transfer engine is running
    pub fn is_busy(&self) -> bool {
        self.lanes.iter().any(|lane| lane.channel.is_active())
    }

    /// Busy-poll until every transfer engine is idle
    pub fn wait_idle(&self) {
        while self.is_busy() {
            core::hint::spin_loop();
        }
    }

    /// Present a frame
    ///
    /// With `wait == false` and a transfer still running, the frame is
    /// dropped and the transmit buffers stay untouched. `source` is only
    /// scattered when `scatter` is true; the previous buffers are re-sent
    /// otherwise.
    pub fn present<S: PixelSource + ?Sized>(&mut self, source: &S, scatter: bool, wait: bool) -> FrameStatus {
        if self.is_busy() {
            if !wait {
                #[cfg(feature = "esp32-log")]
                println!("[Output.present] transfer active, frame dropped");
                return FrameStatus::Dropped;
            }
            self.wait_idle();
        }

        if scatter {
            self.scatter(source);
        }
        self.trigger();

        if wait {
            self.wait_idle();
        }
        FrameStatus::Presented
    }

    /// Single linear pass from the source rows into the transmit buffers
    fn scatter<S: PixelSource + ?Sized>(&mut self, source: &S) {
        let width = self.map.geometry().width();
        let height = self.map.geometry().height();
        let channels = self.map.channel_table();
        let slots = self.map.slot_table();

        for y in 0..height {
            let (head, tail) = source.row(y);
            let base = y * width;
            let row_channels = &channels[base..base + width];
            let row_slots = &slots[base..base + width];
            for ((&word, &ch), &slot) in head
                .iter()
                .chain(tail.iter())
                .zip(row_channels)
                .zip(row_slots)
            {
                if let Some(lane) = self.lanes.get_mut(usize::from(ch)) {
                    if let Some(dst) = lane.tx.get_mut(usize::from(slot)) {
                        *dst = word;
                    }
                }
            }
        }
    }

    /// Arm every idle engine with its full transmit buffer
    fn trigger(&mut self) {
        for lane in &mut self.lanes {
            if !lane.channel.is_active() {
                lane.channel.start(&lane.tx);
            }
        }
    }

    /// Disable every sequencer; idempotent
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        release_all(&mut self.lanes);
        self.released = true;
    }
}

impl<C: OutputChannel> Drop for Output<C> {
    fn drop(&mut self) {
        self.release();
    }
}

fn release_all<C: OutputChannel>(lanes: &mut BoundedVec<Lane<C>, MAX_CHANNELS>) {
    for lane in lanes.iter_mut() {
        lane.channel.release();
    }
}
