//! Metaballs - a blobby screensaver core with a clock overlay
//!
//! Core modules:
//! - `sim`: Ball simulation and the implicit density field
//! - `renderer`: Distance texture sampling, clock SDF, contour geometry, GPU records
//! - `engine`: Host-facing `initialize` / `on_frame` / `on_resize` surface
//! - `config`: Immutable configuration with the stock constant set

pub mod config;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{AaBand, Config};
pub use engine::{Engine, FixedClock, Frame, SystemClock, TimeUpdate, WallClock};
pub use error::{Error, Result};

use glam::Vec2;

/// Stock constants
pub mod consts {
    /// Number of balls moving around
    pub const NUM_BALLS: usize = 5;
    /// Ball record slots in the shading layer's buffer
    pub const MAX_BALLS: usize = 64;
    /// Ball radius as a fraction of the viewport's shorter side
    pub const BALL_SIZE: f32 = 0.1;
    /// Iso-threshold of the density field
    pub const BALL_THRESH: f32 = 0.15;
    /// Average speed in viewport fractions per second
    pub const BALL_SPEED: f32 = 0.1;

    pub const EDGE_HARDNESS: f32 = 0.05;
    /// Proportional gain pulling ball speed toward `BALL_SPEED`
    pub const VELCLAMP_KP: f32 = 0.5;

    /// Marching squares cell size (fraction of viewport)
    pub const SQUARE_SIZE: f32 = 0.001;

    /// Distance texture is viewport / this
    pub const DIST_RENDER_SCALE: u32 = 4;
    /// Time texture is (viewport height * CLOCK_HEIGHT) / this
    pub const TIME_RENDER_SCALE: u32 = 2;
    /// Clock glyph height as a fraction of viewport height
    pub const CLOCK_HEIGHT: f32 = 0.2;

    /// Antialiasing band around the iso crossing, in texels
    pub const AA_START: f32 = -1.0;
    pub const AA_END: f32 = 1.0;

    /// Buffer and texture slots shared with the shading layer
    pub mod slots {
        /// Contour vertex buffer
        pub const VERTEX_IN_VERTICES: u32 = 0;
        /// Ball record buffer read by the distance pass
        pub const DIST_FRAGMENT_IN_BALLS: u32 = 0;

        pub const DIST_TEXTURE: u32 = 0;
        pub const TIME_TEXTURE: u32 = 1;
    }
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the shorter side (never zero)
    #[inline]
    pub fn short_side(&self) -> f32 {
        self.width.min(self.height).max(1) as f32
    }

    /// Per-axis scale mapping normalized offsets to shorter-side units.
    ///
    /// A square viewport gives (1, 1); a 16:9 one gives (1.78, 1).
    #[inline]
    pub fn aspect(&self) -> Vec2 {
        let short = self.short_side();
        Vec2::new(
            self.width.max(1) as f32 / short,
            self.height.max(1) as f32 / short,
        )
    }
}

/// Hermite smoothstep, clamped to [0, 1]
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
