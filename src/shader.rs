//! Text foreground modes and procedural two-color shaders
//!
//! A foreground is resolved once per draw or scroll call into a [`Paint`],
//! which holds packed words and integer thresholds so the per-pixel work is
//! a couple of comparisons.

use alloc::vec::Vec;

use crate::color::{BrightnessTable, PackedColor, Rgb, WHITE};

/// Coordinates handed to a shader for one inked pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderInput {
    /// Column inside the glyph cell
    pub x: i32,
    /// Row inside the glyph cell
    pub y: i32,
    pub glyph_width: i32,
    pub glyph_height: i32,
    /// Index of the character in the string
    pub index: usize,
    pub ch: char,
}

/// Per-pixel foreground pattern
#[derive(Clone, Copy)]
pub enum Shader<'a> {
    /// `left` before `glyph_width * ratio_num / ratio_den`, `right` after
    SplitLeftRight {
        left: Rgb,
        right: Rgb,
        ratio_num: u16,
        ratio_den: u16,
    },
    /// `top` above `glyph_height * ratio_num / ratio_den`, `bottom` below
    SplitTopBottom {
        top: Rgb,
        bottom: Rgb,
        ratio_num: u16,
        ratio_den: u16,
    },
    /// Alternating cells of `cell_width` x `cell_height`
    Checker {
        even: Rgb,
        odd: Rgb,
        cell_width: u16,
        cell_height: u16,
    },
    /// `ink` on the centered cross and both diagonals (arm half-width `arm`),
    /// `other` elsewhere
    Cross { ink: Rgb, other: Rgb, arm: u16 },
    /// Arbitrary callback
    Custom(&'a dyn Fn(ShaderInput) -> Rgb),
}

impl core::fmt::Debug for Shader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SplitLeftRight { .. } => f.write_str("Shader::SplitLeftRight"),
            Self::SplitTopBottom { .. } => f.write_str("Shader::SplitTopBottom"),
            Self::Checker { .. } => f.write_str("Shader::Checker"),
            Self::Cross { .. } => f.write_str("Shader::Cross"),
            Self::Custom(_) => f.write_str("Shader::Custom"),
        }
    }
}

impl Shader<'_> {
    pub const fn split_left_right(left: Rgb, right: Rgb, ratio_num: u16, ratio_den: u16) -> Self {
        Self::SplitLeftRight {
            left,
            right,
            ratio_num,
            ratio_den,
        }
    }

    pub const fn split_top_bottom(top: Rgb, bottom: Rgb, ratio_num: u16, ratio_den: u16) -> Self {
        Self::SplitTopBottom {
            top,
            bottom,
            ratio_num,
            ratio_den,
        }
    }

    pub const fn checker(even: Rgb, odd: Rgb, cell_width: u16, cell_height: u16) -> Self {
        Self::Checker {
            even,
            odd,
            cell_width,
            cell_height,
        }
    }

    pub const fn cross(ink: Rgb, other: Rgb, arm: u16) -> Self {
        Self::Cross { ink, other, arm }
    }
}

/// How text ink is colored
#[derive(Clone, Copy)]
pub enum Foreground<'a> {
    /// One color for the whole string
    Solid(Rgb),
    /// Color per character, cycling when the slice is shorter than the text
    PerChar(&'a [Rgb]),
    /// Color computed once per character from `(index, char)`
    Indexed(&'a dyn Fn(usize, char) -> Rgb),
    /// Per-pixel shader
    Shader(Shader<'a>),
}

impl Default for Foreground<'_> {
    fn default() -> Self {
        Self::Solid(WHITE)
    }
}

impl From<Rgb> for Foreground<'_> {
    fn from(color: Rgb) -> Self {
        Self::Solid(color)
    }
}

impl<'a> From<Shader<'a>> for Foreground<'a> {
    fn from(shader: Shader<'a>) -> Self {
        Self::Shader(shader)
    }
}

impl core::fmt::Debug for Foreground<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
            Self::PerChar(colors) => f.debug_tuple("PerChar").field(&colors.len()).finish(),
            Self::Indexed(_) => f.write_str("Indexed"),
            Self::Shader(shader) => f.debug_tuple("Shader").field(shader).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    SplitLeftRight { threshold: i32 },
    SplitTopBottom { threshold: i32 },
    Checker { cell_width: i32, cell_height: i32 },
    Cross { arm: i32, cx: i32, cy: i32 },
}

/// A foreground resolved against a brightness table and glyph size
pub(crate) enum Paint<'a> {
    Flat(PackedColor),
    Table(Vec<PackedColor>),
    Pattern {
        pattern: Pattern,
        a: PackedColor,
        b: PackedColor,
    },
    Custom(&'a dyn Fn(ShaderInput) -> Rgb),
}

impl<'a> Paint<'a> {
    pub(crate) fn resolve(
        fg: &Foreground<'a>,
        text: &str,
        table: &BrightnessTable,
        glyph_width: usize,
        glyph_height: usize,
    ) -> Self {
        let fw = glyph_width as i32;
        let fh = glyph_height as i32;
        match *fg {
            Foreground::Solid(color) => Self::Flat(table.pack(color)),
            Foreground::PerChar(colors) => {
                if colors.is_empty() {
                    return Self::Flat(table.pack(WHITE));
                }
                let words = (0..text.chars().count())
                    .map(|i| table.pack(colors[i % colors.len()]))
                    .collect();
                Self::Table(words)
            }
            Foreground::Indexed(color_of) => {
                let words = text
                    .chars()
                    .enumerate()
                    .map(|(i, ch)| table.pack(color_of(i, ch)))
                    .collect();
                Self::Table(words)
            }
            Foreground::Shader(shader) => match shader {
                Shader::SplitLeftRight {
                    left,
                    right,
                    ratio_num,
                    ratio_den,
                } => Self::Pattern {
                    pattern: Pattern::SplitLeftRight {
                        threshold: fw * i32::from(ratio_num) / i32::from(ratio_den.max(1)),
                    },
                    a: table.pack(left),
                    b: table.pack(right),
                },
                Shader::SplitTopBottom {
                    top,
                    bottom,
                    ratio_num,
                    ratio_den,
                } => Self::Pattern {
                    pattern: Pattern::SplitTopBottom {
                        threshold: fh * i32::from(ratio_num) / i32::from(ratio_den.max(1)),
                    },
                    a: table.pack(top),
                    b: table.pack(bottom),
                },
                Shader::Checker {
                    even,
                    odd,
                    cell_width,
                    cell_height,
                } => Self::Pattern {
                    pattern: Pattern::Checker {
                        cell_width: i32::from(cell_width.max(1)),
                        cell_height: i32::from(cell_height.max(1)),
                    },
                    a: table.pack(even),
                    b: table.pack(odd),
                },
                Shader::Cross { ink, other, arm } => Self::Pattern {
                    pattern: Pattern::Cross {
                        arm: i32::from(arm),
                        cx: fw >> 1,
                        cy: fh >> 1,
                    },
                    a: table.pack(ink),
                    b: table.pack(other),
                },
                Shader::Custom(callback) => Self::Custom(callback),
            },
        }
    }

    /// Word shared by every pixel of character `index`, if the paint is
    /// uniform over a glyph
    pub(crate) fn glyph_word(&self, index: usize) -> Option<PackedColor> {
        match self {
            Self::Flat(word) => Some(*word),
            Self::Table(words) => words.get(index).copied().or(Some(0)),
            Self::Pattern { .. } | Self::Custom(_) => None,
        }
    }

    /// Word for one inked pixel
    pub(crate) fn word_at(&self, table: &BrightnessTable, input: &ShaderInput) -> PackedColor {
        match self {
            Self::Flat(word) => *word,
            Self::Table(words) => words.get(input.index).copied().unwrap_or(0),
            Self::Pattern { pattern, a, b } => {
                if pattern.selects_first(input.x, input.y) {
                    *a
                } else {
                    *b
                }
            }
            Self::Custom(callback) => table.pack(callback(*input)),
        }
    }
}

impl Pattern {
    fn selects_first(&self, x: i32, y: i32) -> bool {
        match *self {
            Self::SplitLeftRight { threshold } => x < threshold,
            Self::SplitTopBottom { threshold } => y < threshold,
            Self::Checker {
                cell_width,
                cell_height,
            } => ((x / cell_width) + (y / cell_height)) & 1 == 0,
            Self::Cross { arm, cx, cy } => {
                let dx = x - cx;
                let dy = y - cy;
                let on_cross = dx.abs() <= arm || dy.abs() <= arm;
                let on_diagonal = (dx - dy).abs() <= arm || (dx + dy).abs() <= arm;
                on_cross || on_diagonal
            }
        }
    }
}
