//! Scrolling text engine
//!
//! Horizontal scrolls run through a ring buffer one display high; vertical
//! scrolls through a virtual buffer one display wide. Either way a scroll is
//! a [`ScrollJob`]: a small state machine that presents one frame per
//! [`ScrollJob::poll`], so it can be driven from a cooperative main loop or
//! run to completion with [`crate::Matrix::scroll_text`].

mod store;

use embassy_time::Duration;
#[cfg(feature = "esp32-log")]
use esp_println::println;

pub(crate) use store::{RingBuffer, VirtualBuffer, WrapStore};
use store::wrap;

use crate::cancel::CancelToken;
use crate::color::{PackedColor, Rgb};
use crate::error::Error;
use crate::matrix::Matrix;
use crate::output::FrameStatus;
use crate::shader::{Foreground, Paint};
use crate::text::{TextStyle, for_each_ink};
use crate::OutputChannel;

const DIRECTION_NAME_LEFT: &str = "left";
const DIRECTION_NAME_RIGHT: &str = "right";
const DIRECTION_NAME_UP: &str = "up";
const DIRECTION_NAME_DOWN: &str = "down";

/// Direction the text travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn parse_from_str(s: &str) -> Result<Self, Error> {
        match s {
            DIRECTION_NAME_LEFT => Ok(Self::Left),
            DIRECTION_NAME_RIGHT => Ok(Self::Right),
            DIRECTION_NAME_UP => Ok(Self::Up),
            DIRECTION_NAME_DOWN => Ok(Self::Down),
            _ => Err(Error::InvalidDirection),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => DIRECTION_NAME_LEFT,
            Self::Right => DIRECTION_NAME_RIGHT,
            Self::Up => DIRECTION_NAME_UP,
            Self::Down => DIRECTION_NAME_DOWN,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Left and up move the window towards higher lanes
    const fn is_forward(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

/// Parameters of one scroll
#[derive(Debug, Clone, Copy)]
pub struct ScrollOptions<'a> {
    pub direction: Direction,
    /// Pixels moved per frame; values below 1 are treated as 1
    pub step_px: i32,
    /// Pause after each presented frame in [`crate::Matrix::scroll_text`]
    pub delay: Duration,
    /// Wait for each transfer to finish; otherwise busy frames are dropped
    pub wait: bool,
    /// Glyph spacing
    pub style: TextStyle,
    /// Blank rows above each line of a vertical scroll
    pub up_margin: i32,
    /// Blank rows below each line of a vertical scroll
    pub down_margin: i32,
    /// Mirror glyphs when scrolling right
    pub right_mirrored: bool,
    /// Column offset of vertically scrolled lines
    pub x: i32,
    /// Row offset of horizontally scrolled text
    pub y: i32,
    /// Checked before each glyph or line is placed
    pub cancel: Option<&'a CancelToken>,
}

impl Default for ScrollOptions<'_> {
    fn default() -> Self {
        Self {
            direction: Direction::Left,
            step_px: 1,
            delay: Duration::from_millis(0),
            wait: true,
            style: TextStyle::default(),
            up_margin: 1,
            down_margin: 0,
            right_mirrored: false,
            x: 0,
            y: 0,
            cancel: None,
        }
    }
}

impl<'a> ScrollOptions<'a> {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_step(mut self, step_px: i32) -> Self {
        self.step_px = step_px;
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub const fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn with_cancel(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Where a scroll is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Created, buffers not prepared yet
    Idle,
    /// About to write the next glyph (or line) into the store
    PlacingGlyph,
    /// Moving the window towards the last placed content
    Advancing,
    /// Content has left the window; clearing the partial last step
    TailCleanup,
    Done,
}

/// Summary of a finished scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollReport {
    /// Window advances performed
    pub steps: u32,
    /// Pixels the window moved
    pub distance: u32,
    /// Frames dropped because a transfer was still running
    pub dropped: u32,
    /// Stopped by its cancel token
    pub cancelled: bool,
}

/// Outcome of one [`ScrollJob::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPoll {
    /// A frame was handed to the output
    Frame(FrameStatus),
    Done(ScrollReport),
}

/// One scroll in progress
///
/// Borrows the matrix for its whole lifetime; dropping the job early simply
/// abandons the scroll.
pub struct ScrollJob<'a, C: OutputChannel> {
    matrix: &'a mut Matrix<C>,
    text: &'a str,
    paint: Paint<'a>,
    bg: PackedColor,
    opts: ScrollOptions<'a>,
    step: usize,
    phase: ScrollPhase,
    /// Byte offset of the next character to place
    pos: usize,
    /// Index of the next character to place
    index: usize,
    /// Lane where the next block starts (forward) or ends (backward)
    write: isize,
    /// Lanes placed but not yet scrolled into view
    pending: usize,
    text_done: bool,
    exiting: bool,
    report: ScrollReport,
}

impl<C: OutputChannel> core::fmt::Debug for ScrollJob<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollJob")
            .field("direction", &self.opts.direction)
            .field("phase", &self.phase)
            .field("pos", &self.pos)
            .field("pending", &self.pending)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl<'a, C: OutputChannel> ScrollJob<'a, C> {
    pub(crate) fn new(
        matrix: &'a mut Matrix<C>,
        text: &'a str,
        fg: &Foreground<'a>,
        bg: Rgb,
        opts: ScrollOptions<'a>,
    ) -> Self {
        let paint = Paint::resolve(
            fg,
            text,
            &matrix.brightness,
            matrix.font.width(),
            matrix.font.height(),
        );
        let bg = matrix.brightness.pack(bg);
        Self {
            matrix,
            text,
            paint,
            bg,
            opts,
            step: opts.step_px.max(1) as usize,
            phase: ScrollPhase::Idle,
            pos: 0,
            index: 0,
            write: 0,
            pending: 0,
            text_done: false,
            exiting: false,
            report: ScrollReport::default(),
        }
    }

    pub const fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Pause the caller should insert between frames
    pub const fn delay(&self) -> Duration {
        self.opts.delay
    }

    /// Counters so far
    pub const fn report(&self) -> ScrollReport {
        self.report
    }

    /// Run the state machine up to the next presented frame
    pub fn poll(&mut self) -> ScrollPoll {
        loop {
            match self.phase {
                ScrollPhase::Idle => {
                    if self.text.is_empty() {
                        self.phase = ScrollPhase::Done;
                        continue;
                    }
                    self.setup();
                    self.phase = ScrollPhase::PlacingGlyph;
                }
                ScrollPhase::PlacingGlyph => {
                    if self.opts.cancel.is_some_and(CancelToken::is_cancelled) {
                        #[cfg(feature = "esp32-log")]
                        println!("[ScrollJob.poll] cancelled after {} steps", self.report.steps);
                        self.report.cancelled = true;
                        self.phase = ScrollPhase::Done;
                        continue;
                    }
                    let placed = if self.opts.direction.is_horizontal() {
                        self.place_glyph()
                    } else {
                        self.place_line()
                    };
                    if !placed {
                        self.text_done = true;
                    }
                    self.phase = ScrollPhase::Advancing;
                }
                ScrollPhase::Advancing => {
                    if let Some(shift) = self.next_shift() {
                        return ScrollPoll::Frame(self.advance(shift));
                    }
                    if !self.text_done {
                        self.phase = ScrollPhase::PlacingGlyph;
                    } else if !self.exiting {
                        self.exiting = true;
                        self.pending = self.window();
                    } else {
                        self.phase = ScrollPhase::TailCleanup;
                    }
                }
                ScrollPhase::TailCleanup => {
                    self.phase = ScrollPhase::Done;
                    return ScrollPoll::Frame(self.tail_cleanup());
                }
                ScrollPhase::Done => return ScrollPoll::Done(self.report),
            }
        }
    }

    /// Size the store for the current font and text, then fill it with the
    /// background
    fn setup(&mut self) {
        let line_height = self.line_height();
        let m = &mut *self.matrix;
        let width = m.fb.width();
        let height = m.fb.height();
        let step = self.step;

        if self.opts.direction.is_horizontal() {
            let style = self.opts.style;
            let widest = self
                .text
                .chars()
                .map(|ch| {
                    m.font
                        .metrics(ch, style.left_margin, style.right_margin, style.space_scale)
                        .advance
                })
                .max()
                .unwrap_or(0)
                .max(0) as usize;
            m.ring.ensure(width, height, m.font.width().max(widest + step));
            m.ring.reset(self.bg);
            self.write = if self.opts.direction.is_forward() {
                width as isize
            } else {
                -1
            };
        } else {
            m.vbuf.ensure(width, height, line_height + step);
            m.vbuf.reset(self.bg);
            self.write = if self.opts.direction.is_forward() {
                height as isize
            } else {
                -1
            };
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[ScrollJob.setup] {} chars {}, step {}",
            self.text.chars().count(),
            self.opts.direction.as_str(),
            step
        );
    }

    fn line_height(&self) -> usize {
        let lh = self.opts.up_margin + self.matrix.font.height() as i32 + self.opts.down_margin;
        if lh > 0 { lh as usize } else { 1 }
    }

    fn window(&self) -> usize {
        if self.opts.direction.is_horizontal() {
            self.matrix.ring.window()
        } else {
            self.matrix.vbuf.window()
        }
    }

    /// Reserve a block of `len` lanes at the write cursor and return its
    /// first lane
    fn reserve_block(&mut self, len: usize) -> isize {
        let len = len as isize;
        let start = if self.opts.direction.is_forward() {
            let start = self.write;
            self.write += len;
            start
        } else {
            let start = self.write - len + 1;
            self.write -= len;
            start
        };
        self.pending += len as usize;
        start
    }

    /// Write the next character into the ring buffer
    fn place_glyph(&mut self) -> bool {
        let Some(ch) = self.text[self.pos..].chars().next() else {
            return false;
        };
        let index = self.index;
        self.pos += ch.len_utf8();
        self.index += 1;

        let style = self.opts.style;
        let metrics = self
            .matrix
            .font
            .metrics(ch, style.left_margin, style.right_margin, style.space_scale);
        let block = metrics.advance.max(0) as usize;
        let start = self.reserve_block(block);
        self.matrix.ring.clear_lanes(start, block, self.bg);

        let Some(glyph) = metrics.glyph.filter(|_| metrics.has_ink()) else {
            return true;
        };

        let m = &mut *self.matrix;
        let y = i64::from(self.opts.y);
        let font_h = m.font.height() as i64;
        let first_row = (-y).clamp(0, font_h) as usize;
        let rows = first_row..font_h.min(m.fb.height() as i64 - y).max(0) as usize;
        let mirrored = self.opts.right_mirrored && !self.opts.direction.is_forward();
        let lm = style.left_margin as isize;
        let last = start + block as isize - 1;
        let ring = &mut m.ring;
        for_each_ink(
            &m.font,
            glyph,
            &metrics,
            &self.paint,
            &m.brightness,
            (index, ch),
            0..metrics.ink_width,
            rows,
            |col, row, word| {
                let lane = if mirrored {
                    last - lm - col as isize
                } else {
                    start + lm + col as isize
                };
                ring.put(lane, (y + row as i64) as usize, word);
            },
        );
        true
    }

    /// Greedy character wrap: end offset and glyph count of the line that
    /// starts at `self.pos`
    ///
    /// The first glyph always fits, so a line is never empty.
    fn fit_line(&mut self, max_width: i32) -> (usize, usize) {
        let style = self.opts.style;
        let mut width: i32 = 0;
        let mut end = self.pos;
        let mut count = 0;
        for ch in self.text[self.pos..].chars() {
            let advance = self
                .matrix
                .font
                .metrics(ch, style.left_margin, style.right_margin, style.space_scale)
                .advance;
            if count > 0 && width.saturating_add(advance) > max_width {
                break;
            }
            width = width.saturating_add(advance);
            end += ch.len_utf8();
            count += 1;
        }
        (end, count)
    }

    /// Write the next line into the virtual buffer
    fn place_line(&mut self) -> bool {
        if self.pos >= self.text.len() {
            return false;
        }
        let x0 = self.opts.x;
        let display_width = self.matrix.vbuf.width() as i32;
        let (end, _) = self.fit_line(display_width - x0.max(0));

        let line_height = self.line_height();
        let start = self.reserve_block(line_height);
        self.matrix.vbuf.clear_lanes(start, line_height, self.bg);

        let style = self.opts.style;
        let top = start + self.opts.up_margin as isize;
        let m = &mut *self.matrix;
        let rows = 0..m.font.height();
        let mut pen = i64::from(x0);
        for ch in self.text[self.pos..end].chars() {
            let index = self.index;
            self.index += 1;
            let metrics = m
                .font
                .metrics(ch, style.left_margin, style.right_margin, style.space_scale);
            let ink_x = pen + i64::from(style.left_margin);
            pen += i64::from(metrics.advance);
            let Some(glyph) = metrics.glyph.filter(|_| metrics.has_ink()) else {
                continue;
            };
            let ink_w = i64::from(metrics.ink_width);
            let lo = (-ink_x).clamp(0, ink_w.max(0));
            let hi = ink_w.min(i64::from(display_width) - ink_x).max(lo);
            let cols = lo as i32..hi as i32;
            let vbuf = &mut m.vbuf;
            for_each_ink(
                &m.font,
                glyph,
                &metrics,
                &self.paint,
                &m.brightness,
                (index, ch),
                cols,
                rows.clone(),
                |col, row, word| {
                    vbuf.put((ink_x + i64::from(col)) as usize, top + row as isize, word);
                },
            );
        }
        self.pos = end;
        true
    }

    /// Size of the next window move, if one is due
    fn next_shift(&self) -> Option<usize> {
        if self.pending == 0 {
            return None;
        }
        if self.text_done || self.exiting {
            Some(self.pending.min(self.step))
        } else {
            (self.pending >= self.step).then_some(self.step)
        }
    }

    /// Present the window, clear the lanes leaving it and move the head
    fn advance(&mut self, shift: usize) -> FrameStatus {
        let status = self.present();
        let forward = self.opts.direction.is_forward();
        let bg = self.bg;
        let m = &mut *self.matrix;
        let store: &mut dyn WrapStore = if self.opts.direction.is_horizontal() {
            &mut m.ring
        } else {
            &mut m.vbuf
        };

        let head = store.head() as isize;
        let span = store.span();
        if forward {
            store.clear_lanes(head, shift, bg);
            store.set_head(wrap(head + shift as isize, span));
        } else {
            let window = store.window() as isize;
            store.clear_lanes(head + window - shift as isize, shift, bg);
            store.set_head(wrap(head - shift as isize, span));
        }

        self.pending -= shift;
        self.report.steps += 1;
        self.report.distance += shift as u32;
        status
    }

    /// Clear the `step - 1` lanes a partial last move may have left at the
    /// entry edge, then present once more
    fn tail_cleanup(&mut self) -> FrameStatus {
        let lanes = self.step - 1;
        if lanes > 0 {
            let forward = self.opts.direction.is_forward();
            let bg = self.bg;
            let m = &mut *self.matrix;
            let store: &mut dyn WrapStore = if self.opts.direction.is_horizontal() {
                &mut m.ring
            } else {
                &mut m.vbuf
            };
            let head = store.head() as isize;
            if forward {
                let edge = head + store.window() as isize - 1;
                store.clear_lanes(edge - lanes as isize + 1, lanes, bg);
            } else {
                store.clear_lanes(head, lanes, bg);
            }
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[ScrollJob.tail_cleanup] finished after {} steps, {} px",
            self.report.steps, self.report.distance
        );
        self.present()
    }

    fn present(&mut self) -> FrameStatus {
        let m = &mut *self.matrix;
        let status = if self.opts.direction.is_horizontal() {
            m.output.present(&m.ring, true, self.opts.wait)
        } else {
            m.output.present(&m.vbuf, true, self.opts.wait)
        };
        match status {
            // The transmit buffers no longer hold the framebuffer
            FrameStatus::Presented => m.fb.mark_dirty(),
            FrameStatus::Dropped => self.report.dropped += 1,
        }
        status
    }
}
