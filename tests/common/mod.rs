#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use led_matrix_composer::sequencer::ChannelId;
use led_matrix_composer::{
    ClaimError, FontDescriptor, Matrix, MatrixConfig, OutputChannel, PackedColor, PanelGeometry,
};

/// What the mock hardware saw
#[derive(Debug, Default)]
pub struct Bench {
    /// Transfer engines report active while set
    pub busy: bool,
    /// Every started transfer: `(channel id, words)`
    pub frames: Vec<(u8, Vec<PackedColor>)>,
    pub claimed: Vec<(u8, u8)>,
    pub released: usize,
}

pub type SharedBench = Rc<RefCell<Bench>>;

pub fn bench() -> SharedBench {
    Rc::new(RefCell::new(Bench::default()))
}

#[derive(Debug)]
pub struct MockChannel {
    id: u8,
    bench: SharedBench,
}

impl OutputChannel for MockChannel {
    fn is_active(&self) -> bool {
        self.bench.borrow().busy
    }

    fn start(&mut self, words: &[PackedColor]) {
        self.bench.borrow_mut().frames.push((self.id, words.to_vec()));
    }

    fn release(&mut self) {
        self.bench.borrow_mut().released += 1;
    }
}

/// Factory handing out mock channels; claiming `fail_pin` fails
pub fn factory(
    bench: &SharedBench,
    fail_pin: Option<u8>,
) -> impl FnMut(u8, ChannelId) -> Result<MockChannel, ClaimError> {
    let bench = Rc::clone(bench);
    move |pin, id| {
        if Some(pin) == fail_pin {
            return Err(ClaimError);
        }
        bench.borrow_mut().claimed.push((pin, id.raw()));
        Ok(MockChannel {
            id: id.raw(),
            bench: Rc::clone(&bench),
        })
    }
}

pub const GLYPH_QUESTION: [u8; 8] = [
    0b0011_1000,
    0b0100_0100,
    0b0000_0100,
    0b0000_1000,
    0b0001_0000,
    0b0000_0000,
    0b0001_0000,
    0b0000_0000,
];

pub const GLYPH_A: [u8; 8] = [
    0b0011_1000,
    0b0100_0100,
    0b0100_0100,
    0b0111_1100,
    0b0100_0100,
    0b0100_0100,
    0b0100_0100,
    0b0000_0000,
];

pub const GLYPH_H: [u8; 8] = [
    0b0100_0100,
    0b0100_0100,
    0b0100_0100,
    0b0111_1100,
    0b0100_0100,
    0b0100_0100,
    0b0100_0100,
    0b0000_0000,
];

pub const GLYPH_I: [u8; 8] = [
    0b0011_1000,
    0b0001_0000,
    0b0001_0000,
    0b0001_0000,
    0b0001_0000,
    0b0001_0000,
    0b0011_1000,
    0b0000_0000,
];

/// Glyph slots of the dense font: `'?'..='I'`, only `?`, `A`, `H` and `I`
/// carry ink
const DENSE_GLYPHS: usize = ('I' as usize) - ('?' as usize) + 1;

const fn build_dense() -> [u8; DENSE_GLYPHS * 8] {
    let mut data = [0u8; DENSE_GLYPHS * 8];
    let glyphs = [
        ('?', GLYPH_QUESTION),
        ('A', GLYPH_A),
        ('H', GLYPH_H),
        ('I', GLYPH_I),
    ];
    let mut g = 0;
    while g < glyphs.len() {
        let (ch, rows) = glyphs[g];
        let base = (ch as usize - '?' as usize) * 8;
        let mut r = 0;
        while r < 8 {
            data[base + r] = rows[r];
            r += 1;
        }
        g += 1;
    }
    data
}

const fn build_sparse() -> [u8; 32] {
    let mut data = [0u8; 32];
    let glyphs = [GLYPH_QUESTION, GLYPH_A, GLYPH_H, GLYPH_I];
    let mut g = 0;
    while g < glyphs.len() {
        let mut r = 0;
        while r < 8 {
            data[g * 8 + r] = glyphs[g][r];
            r += 1;
        }
        g += 1;
    }
    data
}

pub static DENSE_DATA: [u8; DENSE_GLYPHS * 8] = build_dense();
pub static SPARSE_DATA: [u8; 32] = build_sparse();
pub static SPARSE_CODES: [u32; 4] = ['?' as u32, 'A' as u32, 'H' as u32, 'I' as u32];
pub static SPARSE_OFFSETS: [u32; 4] = [0, 8, 16, 24];

pub fn dense_font() -> FontDescriptor {
    FontDescriptor::dense(&DENSE_DATA, 8, 8, '?' as u32, 'I' as u32)
}

pub fn sparse_font() -> FontDescriptor {
    FontDescriptor::sparse(&SPARSE_DATA, 8, 8, &SPARSE_CODES, &SPARSE_OFFSETS)
}

/// 16x16 font covering `'H'..='I'`: both glyphs are an 8 px wide bar in
/// columns 4..12, so each advances 9 px
pub static WIDE_DATA: [u8; 64] = {
    let mut data = [0u8; 64];
    let mut i = 0;
    while i < 64 {
        data[i] = if i % 2 == 0 { 0x0F } else { 0xF0 };
        i += 1;
    }
    data
};

pub fn wide_font() -> FontDescriptor {
    FontDescriptor::dense(&WIDE_DATA, 16, 16, 'H' as u32, 'I' as u32)
}

pub fn single_panel(width: u16, height: u16) -> PanelGeometry {
    PanelGeometry {
        panel_width: width,
        panel_height: height,
        ..PanelGeometry::default()
    }
}

/// 16x16 display on one channel
pub fn matrix(bench: &SharedBench, brightness: f32) -> Matrix<MockChannel> {
    matrix_with(bench, single_panel(16, 16), &[(2, 0)], brightness)
}

pub fn matrix_with(
    bench: &SharedBench,
    geometry: PanelGeometry,
    outputs: &[(u8, u8)],
    brightness: f32,
) -> Matrix<MockChannel> {
    let config = MatrixConfig {
        outputs,
        geometry,
        brightness,
        font: dense_font(),
    };
    let mut factory = factory(bench, None);
    match Matrix::new(&mut factory, &config) {
        Ok(matrix) => matrix,
        Err(err) => panic!("matrix construction failed: {err}"),
    }
}

/// Words of the most recent transfer on channel `id`
pub fn last_frame(bench: &SharedBench, id: u8) -> Vec<PackedColor> {
    bench
        .borrow()
        .frames
        .iter()
        .rev()
        .find(|(ch, _)| *ch == id)
        .map(|(_, words)| words.clone())
        .unwrap_or_default()
}
