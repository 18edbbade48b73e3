//! Proportional text layout and the static text renderer.

use core::ops::Range;

use crate::color::{BrightnessTable, PackedColor};
use crate::font::{CharMetrics, Font, Glyph};
use crate::framebuffer::FrameBuffer;
use crate::shader::{Paint, ShaderInput};

/// Spacing applied between glyphs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Space width as a fraction of the font width
    pub space_scale: f32,
    /// Blank columns before each glyph's ink
    pub left_margin: i32,
    /// Blank columns after each glyph's ink
    pub right_margin: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            space_scale: 0.3,
            left_margin: 0,
            right_margin: 1,
        }
    }
}

/// Total advance of `text` under `style`
pub(crate) fn measure_text(font: &mut Font, text: &str, style: &TextStyle) -> i32 {
    text.chars()
        .map(|ch| font.metrics(ch, style.left_margin, style.right_margin, style.space_scale).advance)
        .fold(0, i32::saturating_add)
}

/// Walk the inked pixels of one glyph
///
/// `cols` is the visible range of ink-relative columns (`0` is the first
/// inked column) and `rows` the visible glyph rows; both are trusted.
/// `plot` receives `(ink column, glyph row, word)`.
pub(crate) fn for_each_ink(
    font: &Font,
    glyph: Glyph,
    metrics: &CharMetrics,
    paint: &Paint<'_>,
    table: &BrightnessTable,
    (index, ch): (usize, char),
    cols: Range<i32>,
    rows: Range<usize>,
    mut plot: impl FnMut(i32, usize, PackedColor),
) {
    let uniform = paint.glyph_word(index);
    let mut input = ShaderInput {
        x: 0,
        y: 0,
        glyph_width: font.width() as i32,
        glyph_height: font.height() as i32,
        index,
        ch,
    };
    for row in rows {
        let bits = font.row_bits(glyph, row);
        if bits == 0 {
            continue;
        }
        for col in cols.clone() {
            let c = metrics.ink_left + col;
            if !font.bit(bits, c as usize) {
                continue;
            }
            let word = match uniform {
                Some(word) => word,
                None => {
                    input.x = c;
                    input.y = row as i32;
                    paint.word_at(table, &input)
                }
            };
            plot(col, row, word);
        }
    }
}

/// Draw `text` with its top-left corner at `(x, y)`
///
/// Glyphs entirely outside the buffer are skipped without touching memory,
/// but their advance still counts. Returns the total advance.
pub(crate) fn draw_text(
    fb: &mut FrameBuffer,
    font: &mut Font,
    table: &BrightnessTable,
    text: &str,
    x: i32,
    y: i32,
    style: &TextStyle,
    paint: &Paint<'_>,
    bg: Option<PackedColor>,
) -> i32 {
    // Positions are tracked in i64 so pens near the i32 limits clip instead
    // of overflowing
    let fw = font.width() as i64;
    let fh = font.height() as i64;
    let fb_w = fb.width() as i64;
    let fb_h = fb.height() as i64;
    let y = i64::from(y);
    let skip_drawing = y + fh <= 0 || y >= fb_h;

    let rows = (-y).clamp(0, fh) as usize..fh.min(fb_h - y).max(0) as usize;
    let mut pen = i64::from(x);
    let mut total: i32 = 0;
    let mut drawn = false;

    for (index, ch) in text.chars().enumerate() {
        let metrics = font.metrics(ch, style.left_margin, style.right_margin, style.space_scale);
        let advance = i64::from(metrics.advance);
        total = total.saturating_add(metrics.advance);

        let visible = pen + advance > 0 && pen < fb_w;
        if skip_drawing || !visible || !metrics.has_ink() {
            pen += advance;
            continue;
        }
        let Some(glyph) = metrics.glyph else {
            pen += advance;
            continue;
        };

        if let Some(word) = bg {
            let x0 = pen.max(0) as i32;
            let x1 = (pen + advance - 1).min(fb_w - 1) as i32;
            for row in rows.clone() {
                fb.hspan((y + row as i64) as i32, x0, x1, word);
            }
        }

        let ink_x = pen + i64::from(style.left_margin);
        let lo = (-ink_x).clamp(0, fw);
        let hi = i64::from(metrics.ink_width).min(fb_w - ink_x).min(fw).max(lo);
        for_each_ink(
            font,
            glyph,
            &metrics,
            paint,
            table,
            (index, ch),
            lo as i32..hi as i32,
            rows.clone(),
            |col, row, word| {
                let dst = fb.row_mut((y + row as i64) as usize);
                dst[(ink_x + i64::from(col)) as usize] = word;
            },
        );
        drawn = true;
        pen += advance;
    }

    if drawn {
        fb.mark_dirty();
    }
    total
}
