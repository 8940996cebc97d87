//! Seven-segment clock glyphs
//!
//! ```text
//!  aaa
//! f   b
//!  ggg
//! e   c
//!  ddd
//! ```
//!
//! Each segment is a capsule; the colon is two round dots. All geometry is
//! proportional to the cell height so glyphs scale with the target texture.

use glam::Vec2;

use super::sdf::{sd_capsule, sd_circle, sd_union};

/// Lit segments per digit, bit 0 = a through bit 6 = g
pub const DIGIT_SEGMENTS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

/// Digit cell width relative to cell height
pub const DIGIT_ASPECT: f32 = 0.6;
/// Colon cell width relative to cell height
pub const COLON_ASPECT: f32 = 0.3;

// Proportions relative to cell height
const GLYPH_WIDTH: f32 = 0.4;
const VERTICAL_PAD: f32 = 0.12;
const STROKE_RADIUS: f32 = 0.05;
const SEGMENT_INSET: f32 = 0.03;
const DOT_OFFSET: f32 = 0.18;
const DOT_RADIUS: f32 = 0.06;

/// Something that can be drawn into one clock cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Digit(u8),
    Colon,
}

impl Glyph {
    /// Cell width in texels for a given cell height
    pub fn cell_width(&self, height: u32) -> u32 {
        let aspect = match self {
            Glyph::Digit(_) => DIGIT_ASPECT,
            Glyph::Colon => COLON_ASPECT,
        };
        ((height as f32 * aspect).round() as u32).max(1)
    }

    /// Clear space between the glyph's strokes and the left/right cell edges
    pub fn margin(&self, cell: Vec2) -> f32 {
        let h = cell.y;
        match self {
            Glyph::Digit(_) => (cell.x - GLYPH_WIDTH * h) * 0.5 - STROKE_RADIUS * h,
            Glyph::Colon => cell.x * 0.5 - DOT_RADIUS * h,
        }
    }

    /// Signed distance from `p` (texels, origin at the cell's top-left, y down)
    /// to this glyph drawn in a cell of the given size.
    pub fn sdf(&self, p: Vec2, cell: Vec2) -> f32 {
        match *self {
            Glyph::Digit(digit) => digit_sdf(p, digit, cell),
            Glyph::Colon => colon_sdf(p, cell),
        }
    }
}

/// Segment endpoints (a..g) for a digit cell
fn segments(cell: Vec2) -> [(Vec2, Vec2); 7] {
    let h = cell.y;
    let x0 = (cell.x - GLYPH_WIDTH * h) * 0.5;
    let x1 = x0 + GLYPH_WIDTH * h;
    let y0 = VERTICAL_PAD * h;
    let y1 = h - VERTICAL_PAD * h;
    let ym = h * 0.5;
    let inset = SEGMENT_INSET * h;

    let horizontal = |y: f32| (Vec2::new(x0 + inset, y), Vec2::new(x1 - inset, y));
    let vertical = |x: f32, top: f32, bottom: f32| {
        (Vec2::new(x, top + inset), Vec2::new(x, bottom - inset))
    };

    [
        horizontal(y0),       // a
        vertical(x1, y0, ym), // b
        vertical(x1, ym, y1), // c
        horizontal(y1),       // d
        vertical(x0, ym, y1), // e
        vertical(x0, y0, ym), // f
        horizontal(ym),       // g
    ]
}

fn digit_sdf(p: Vec2, digit: u8, cell: Vec2) -> f32 {
    let mask = DIGIT_SEGMENTS[(digit % 10) as usize];
    let radius = STROKE_RADIUS * cell.y;
    sd_union(
        segments(cell)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, (a, b))| sd_capsule(p, a, b, radius)),
    )
}

fn colon_sdf(p: Vec2, cell: Vec2) -> f32 {
    let h = cell.y;
    let cx = cell.x * 0.5;
    let radius = DOT_RADIUS * h;
    let upper = Vec2::new(cx, h * (0.5 - DOT_OFFSET));
    let lower = Vec2::new(cx, h * (0.5 + DOT_OFFSET));
    sd_circle(p, upper, radius).min(sd_circle(p, lower, radius))
}
