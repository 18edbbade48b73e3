//! Output channel backed by any blocking `smart-leds` writer.

use smart_leds::{RGB8, SmartLedsWrite};

use crate::OutputChannel;
use crate::color::{PackedColor, unpack_grb};

/// Adapter that streams packed words through a [`SmartLedsWrite`] driver
///
/// The writer blocks until the strip is updated, so the channel never
/// reports active. A failed write is remembered until [`Self::take_error`].
#[derive(Debug)]
pub struct SmartLedsChannel<W> {
    writer: W,
    failed: bool,
}

impl<W> SmartLedsChannel<W>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Returns true once if a write failed since the last call
    pub fn take_error(&mut self) -> bool {
        core::mem::take(&mut self.failed)
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputChannel for SmartLedsChannel<W>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    fn is_active(&self) -> bool {
        false
    }

    fn start(&mut self, words: &[PackedColor]) {
        let pixels = words.iter().map(|&word| unpack_grb(word));
        if self.writer.write(pixels).is_err() {
            self.failed = true;
        }
    }
}
