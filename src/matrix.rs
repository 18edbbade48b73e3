//! The display object: framebuffer, output channels, brightness and font.

use embassy_time::{Duration, Instant, block_for};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{BLACK, BrightnessTable, PackedColor, Rgb, unpack_grb};
use crate::draw::{BitmapMode, ShapeStyle, ShapeWords};
use crate::effect::Effect;
use crate::font::{Font, FontDescriptor, FontLoader};
use crate::framebuffer::FrameBuffer;
use crate::layout::{PanelGeometry, PixelMap};
use crate::output::{FrameStatus, Output};
use crate::scroll::{RingBuffer, ScrollJob, ScrollOptions, ScrollPoll, ScrollReport, VirtualBuffer, WrapStore};
use crate::shader::{Foreground, Paint};
use crate::text::{self, TextStyle};
use crate::{ChannelFactory, Error, OutputChannel};

/// Time the strips get to latch the final black frame in [`Matrix::deinit`]
const DEINIT_SETTLE: Duration = Duration::from_millis(50);

/// Construction parameters of a [`Matrix`]
#[derive(Debug, Clone, Copy)]
pub struct MatrixConfig<'a> {
    /// `(pin, channel id)` per output, in panel order
    pub outputs: &'a [(u8, u8)],
    pub geometry: PanelGeometry,
    /// Initial brightness, clamped to `0.0..=1.0`
    pub brightness: f32,
    pub font: FontDescriptor,
}

/// Addressable LED matrix
///
/// Owns the framebuffer, the mapping table, every output channel and the
/// scroll buffers. Drawing calls only touch the framebuffer; nothing reaches
/// the LEDs until [`Matrix::update`].
#[derive(Debug)]
pub struct Matrix<C: OutputChannel> {
    pub(crate) fb: FrameBuffer,
    pub(crate) output: Output<C>,
    pub(crate) brightness: BrightnessTable,
    pub(crate) font: Font,
    pub(crate) ring: RingBuffer,
    pub(crate) vbuf: VirtualBuffer,
}

impl<C: OutputChannel> Matrix<C> {
    /// Validate the configuration and claim every channel
    ///
    /// Nothing is returned on failure; channels claimed before the error
    /// are released.
    pub fn new<F>(factory: &mut F, config: &MatrixConfig<'_>) -> Result<Self, Error>
    where
        F: ChannelFactory<Channel = C>,
    {
        let font = Font::new(config.font)?;
        let output = Output::new(factory, config.outputs, config.geometry)?;
        let geometry = config.geometry;

        #[cfg(feature = "esp32-log")]
        println!(
            "[Matrix.new] {}x{} px, {}x{} panels, {} channels",
            geometry.width(),
            geometry.height(),
            geometry.grid_width,
            geometry.grid_height,
            output.channel_count()
        );

        Ok(Self {
            fb: FrameBuffer::new(geometry.width(), geometry.height()),
            output,
            brightness: BrightnessTable::new(config.brightness),
            font,
            ring: RingBuffer::default(),
            vbuf: VirtualBuffer::default(),
        })
    }

    pub const fn width(&self) -> usize {
        self.fb.width()
    }

    pub const fn height(&self) -> usize {
        self.fb.height()
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness.level()
    }

    /// Set the brightness used for colors packed from now on
    pub fn set_brightness(&mut self, level: f32) {
        self.brightness.set_level(level);
    }

    pub const fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    pub const fn brightness_table(&self) -> &BrightnessTable {
        &self.brightness
    }

    pub const fn font(&self) -> &Font {
        &self.font
    }

    pub const fn map(&self) -> &PixelMap {
        self.output.map()
    }

    pub const fn output(&self) -> &Output<C> {
        &self.output
    }

    /// Transmit buffer of channel `index`
    pub fn tx_buffer(&self, index: usize) -> Option<&[PackedColor]> {
        self.output.tx_buffer(index)
    }

    /// Columns in the horizontal scroll ring, visible window included
    pub fn scroll_ring_width(&self) -> usize {
        self.ring.span()
    }

    /// Ring column shown at the left edge after the last horizontal scroll
    pub fn scroll_ring_head(&self) -> usize {
        self.ring.head()
    }

    #[inline]
    fn pack(&self, color: Rgb) -> PackedColor {
        self.brightness.pack(color)
    }

    fn shape_words(&self, style: ShapeStyle) -> ShapeWords {
        ShapeWords {
            outline: style.outline.map(|c| self.pack(c)),
            fill: style.fill.map(|c| self.pack(c)),
        }
    }

    /// Stored color at `(x, y)`, already brightness-scaled
    pub fn pixel(&self, x: i32, y: i32) -> Result<Rgb, Error> {
        self.fb
            .get(x, y)
            .map(unpack_grb)
            .ok_or(Error::OutOfBounds { x, y })
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), Error> {
        if !self.fb.contains(x, y) {
            return Err(Error::OutOfBounds { x, y });
        }
        let word = self.pack(color);
        self.fb.put(x, y, word);
        self.fb.mark_dirty();
        Ok(())
    }

    pub fn fill(&mut self, color: Rgb) {
        let word = self.pack(color);
        self.fb.fill(word);
    }

    /// Blank the display and wait for the transfer
    pub fn clear(&mut self) -> FrameStatus {
        self.fill(BLACK);
        self.update(true)
    }

    /// Push the framebuffer to the LEDs
    ///
    /// With `wait == false` and a transfer still running the frame is
    /// dropped and nothing is touched. The framebuffer is only scattered
    /// into the transmit buffers when it changed since the last update.
    pub fn update(&mut self, wait: bool) -> FrameStatus {
        let scatter = self.fb.is_dirty();
        let status = self.output.present(&self.fb, scatter, wait);
        if scatter && status.is_presented() {
            self.fb.clear_dirty();
        }
        status
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let word = self.pack(color);
        self.fb.line(x0, y0, x1, y1, word);
    }

    /// Line of `length` pixels centered on `(cx, cy)`
    pub fn draw_line_polar(&mut self, cx: i32, cy: i32, length: i32, angle_deg: i32, color: Rgb) {
        let word = self.pack(color);
        self.fb.line_polar(cx, cy, length, angle_deg, word);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, style: ShapeStyle) {
        let words = self.shape_words(style);
        self.fb.rect(x, y, w, h, words);
    }

    /// Rectangle centered on `(cx, cy)` rotated by `angle_deg`
    pub fn draw_rect_rotated(&mut self, cx: i32, cy: i32, w: i32, h: i32, angle_deg: f32, style: ShapeStyle) {
        let words = self.shape_words(style);
        self.fb.rect_rotated(cx, cy, w, h, angle_deg, words);
    }

    pub fn draw_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, angle_deg: f32, style: ShapeStyle) {
        let words = self.shape_words(style);
        self.fb.ellipse(cx, cy, rx, ry, angle_deg, words);
    }

    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, style: ShapeStyle) {
        self.draw_ellipse(cx, cy, r, r, 0.0, style);
    }

    /// Blit a row-padded 1-bit bitmap (MSB first) in `color`
    pub fn draw_bitmap_1bit(
        &mut self,
        data: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        color: Rgb,
        mode: BitmapMode,
        outline: bool,
    ) -> Result<(), Error> {
        let word = self.pack(color);
        self.fb.bitmap_1bit(data, width, height, x, y, word, mode, outline)
    }

    /// Blit a bitmap of `r, g, b` byte triples
    pub fn draw_bitmap_rgb(
        &mut self,
        data: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        mode: BitmapMode,
    ) -> Result<(), Error> {
        self.fb
            .bitmap_rgb(data, width, height, x, y, mode, &self.brightness)
    }

    /// Draw `text` at `(x, y)` and return its total advance
    ///
    /// With `bg` set, each inked glyph's advance block is filled first.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        style: &TextStyle,
        fg: &Foreground<'_>,
        bg: Option<Rgb>,
    ) -> i32 {
        let paint = Paint::resolve(fg, text, &self.brightness, self.font.width(), self.font.height());
        let bg = bg.map(|c| self.pack(c));
        text::draw_text(
            &mut self.fb,
            &mut self.font,
            &self.brightness,
            text,
            x,
            y,
            style,
            &paint,
            bg,
        )
    }

    /// Advance `draw_text` would return, without drawing
    pub fn measure_text(&mut self, text: &str, style: &TextStyle) -> i32 {
        text::measure_text(&mut self.font, text, style)
    }

    /// Prepare a resumable scroll; each [`ScrollJob::poll`] presents a frame
    pub fn start_scroll<'a>(
        &'a mut self,
        text: &'a str,
        fg: &Foreground<'a>,
        bg: Rgb,
        opts: ScrollOptions<'a>,
    ) -> ScrollJob<'a, C> {
        ScrollJob::new(self, text, fg, bg, opts)
    }

    /// Scroll `text` across the display, sleeping `opts.delay` after every
    /// frame, until it has fully left the window or is cancelled
    pub fn scroll_text<'a>(
        &'a mut self,
        text: &'a str,
        fg: &Foreground<'a>,
        bg: Rgb,
        opts: ScrollOptions<'a>,
    ) -> ScrollReport {
        let delay = opts.delay;
        let mut job = self.start_scroll(text, fg, bg, opts);
        loop {
            match job.poll() {
                ScrollPoll::Frame(_) => {
                    if delay.as_ticks() > 0 {
                        block_for(delay);
                    }
                }
                ScrollPoll::Done(report) => return report,
            }
        }
    }

    /// Let `effect` paint the next frame into the framebuffer
    pub fn render_effect<E: Effect>(&mut self, effect: &mut E, now: Instant) {
        effect.render(now, &mut self.fb, &self.brightness);
    }

    /// Switch to another font
    pub fn set_font(&mut self, desc: FontDescriptor) -> Result<(), Error> {
        self.font = Font::new(desc)?;
        Ok(())
    }

    /// Load `name` through `loader` and switch to it
    ///
    /// The previous font is handed back to the loader once the new one is
    /// in place.
    pub fn load_font<L: FontLoader>(&mut self, loader: &mut L, name: &str) -> Result<(), Error> {
        let desc = loader.load(name)?;
        let previous = *self.font.descriptor();
        if let Err(err) = self.set_font(desc) {
            loader.unload(&desc);
            return Err(err);
        }
        loader.unload(&previous);
        Ok(())
    }

    /// Blank the display and release every channel
    pub fn deinit(mut self) {
        self.fill(BLACK);
        self.update(true);
        block_for(DEINIT_SETTLE);
        self.output.release();

        #[cfg(feature = "esp32-log")]
        println!("[Matrix.deinit] channels released");
    }
}
