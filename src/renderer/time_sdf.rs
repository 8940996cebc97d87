//! Clock readout rasterized as a signed distance field
//!
//! Layout is five cells, `[H][H][:][M][M]`. Each texel holds the signed
//! distance to the nearest glyph edge in texels, negative inside a stroke,
//! clamped to `±spread`. The spread never reaches past a glyph's side margin
//! into the next cell, so changing one digit only touches that digit's columns.

use std::fmt;
use std::num::NonZeroU32;
use std::ops::Range;

use glam::Vec2;

use super::glyphs::Glyph;
use crate::error::{Error, Result};

/// A validated hour/minute pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Fails with `InvalidTimeValue` outside 0-23 / 0-59
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTimeValue { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// The four displayed digits, zero padded
    pub fn digits(&self) -> [u8; 4] {
        [
            self.hour / 10,
            self.hour % 10,
            self.minute / 10,
            self.minute % 10,
        ]
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Index of each cell in the layout
pub mod cell {
    pub const HOUR_TENS: usize = 0;
    pub const HOUR_ONES: usize = 1;
    pub const COLON: usize = 2;
    pub const MINUTE_TENS: usize = 3;
    pub const MINUTE_ONES: usize = 4;
}

/// Column ranges of the five cells for a given height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLayout {
    pub height: u32,
    columns: [Range<u32>; 5],
}

impl TimeLayout {
    pub fn new(height: u32) -> Self {
        let digit = Glyph::Digit(0).cell_width(height);
        let colon = Glyph::Colon.cell_width(height);
        let widths = [digit, digit, colon, digit, digit];

        let mut x = 0;
        let columns = widths.map(|w| {
            let range = x..x + w;
            x += w;
            range
        });
        Self { height, columns }
    }

    pub fn width(&self) -> u32 {
        self.columns[cell::MINUTE_ONES].end
    }

    pub fn columns(&self, cell: usize) -> Range<u32> {
        self.columns[cell].clone()
    }

    /// Which cell a column falls in
    pub fn cell_at(&self, x: u32) -> Option<usize> {
        self.columns.iter().position(|r| r.contains(&x))
    }

    /// Size of a cell in texels
    pub fn cell_size(&self, cell: usize) -> Vec2 {
        Vec2::new(self.columns[cell].len() as f32, self.height as f32)
    }

    /// Largest distance stored in the texture, in texels.
    ///
    /// Texel centres outside a cell sit at least half a texel beyond its edge,
    /// so no neighbouring glyph is ever nearer than the narrowest side margin.
    pub fn spread(&self) -> f32 {
        let margin = (0..self.columns.len())
            .map(|i| {
                let glyph = if i == cell::COLON {
                    Glyph::Colon
                } else {
                    Glyph::Digit(0)
                };
                glyph.margin(self.cell_size(i))
            })
            .fold(f32::MAX, f32::min);
        margin.max(0.5)
    }
}

/// Signed-distance texture of one clock reading
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTexture {
    pub time: ClockTime,
    pub layout: TimeLayout,
    data: Vec<f32>,
}

impl TimeTexture {
    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width() as usize + x as usize]
    }

    /// Row-major texel values
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes for an `R32Float` upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Rasterizes clock readings at a fixed target height.
///
/// Stateless apart from the height; callers decide when to regenerate.
#[derive(Debug, Clone)]
pub struct TimeSdfGenerator {
    layout: TimeLayout,
}

impl TimeSdfGenerator {
    pub fn new(target_height: u32) -> Result<Self> {
        NonZeroU32::new(target_height)
            .map(Self::with_height)
            .ok_or_else(|| Error::config("time texture height must be > 0"))
    }

    pub fn with_height(target_height: NonZeroU32) -> Self {
        Self {
            layout: TimeLayout::new(target_height.get()),
        }
    }

    pub fn layout(&self) -> &TimeLayout {
        &self.layout
    }

    /// Validate and rasterize `hour:minute`
    pub fn generate(&self, hour: u32, minute: u32) -> Result<TimeTexture> {
        Ok(self.render(ClockTime::new(hour, minute)?))
    }

    /// Rasterize an already validated time
    pub fn render(&self, time: ClockTime) -> TimeTexture {
        let layout = self.layout.clone();
        let [h1, h2, m1, m2] = time.digits();
        let glyphs = [
            Glyph::Digit(h1),
            Glyph::Digit(h2),
            Glyph::Colon,
            Glyph::Digit(m1),
            Glyph::Digit(m2),
        ];

        let width = layout.width();
        let height = layout.height;
        let spread = layout.spread();
        let cells: [(f32, Vec2); 5] =
            std::array::from_fn(|i| (layout.columns(i).start as f32, layout.cell_size(i)));
        let mut data = Vec::with_capacity(width as usize * height as usize);

        for y in 0..height {
            for x in 0..width {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let nearest = glyphs
                    .iter()
                    .zip(&cells)
                    .map(|(glyph, &(start, size))| glyph.sdf(p - Vec2::X * start, size))
                    .fold(f32::MAX, f32::min);
                data.push(nearest.clamp(-spread, spread));
            }
        }

        log::debug!("Rasterized clock {} at {}x{}", time, width, height);
        TimeTexture { time, layout, data }
    }
}

/// Rasterize `hour:minute` into a texture `target_height` texels tall
pub fn generate(hour: u32, minute: u32, target_height: u32) -> Result<TimeTexture> {
    TimeSdfGenerator::new(target_height)?.generate(hour, minute)
}
