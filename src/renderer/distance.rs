//! Distance texture sampling
//!
//! Evaluates the density field once per texel of a grid reduced from the
//! viewport by the render scale. Cost is O(texels x balls), which is why the
//! render scale exists.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::Viewport;
use crate::sim::{Ball, FieldParams, coverage, evaluate};

/// Sampling grid size in texels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport divided by `render_scale`, rounded up, at least 1x1
    pub fn scaled(viewport: Viewport, render_scale: u32) -> Self {
        let scale = render_scale.max(1);
        Self {
            width: viewport.width.div_ceil(scale).max(1),
            height: viewport.height.div_ceil(scale).max(1),
        }
    }

    /// Grid of square cells `square_size` (fraction of the shorter side) wide
    pub fn from_square_size(viewport: Viewport, square_size: f32) -> Self {
        let cell = (square_size * viewport.short_side()).max(1.0);
        Self {
            width: ((viewport.width as f32 / cell).ceil() as u32).max(1),
            height: ((viewport.height as f32 / cell).ceil() as u32).max(1),
        }
    }

    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one texel in normalized coordinates
    pub fn texel_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    /// Normalized coordinate of the centre of texel (x, y)
    #[inline]
    pub fn texel_center(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }
}

/// One sample of the field (matches an `Rgba32Float` texel)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FieldTexel {
    pub density: f32,
    /// Antialiased alpha of the silhouette
    pub coverage: f32,
    /// Density gradient in normalized coordinates
    pub gradient: [f32; 2],
}

/// Field sampled over a grid, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTexture {
    pub resolution: Resolution,
    texels: Vec<FieldTexel>,
}

impl DistanceTexture {
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> &FieldTexel {
        &self.texels[(y * self.resolution.width + x) as usize]
    }

    pub fn texels(&self) -> &[FieldTexel] {
        &self.texels
    }

    /// Mean coverage, i.e. the fraction of the texture inside the silhouette
    pub fn covered_fraction(&self) -> f32 {
        if self.texels.is_empty() {
            return 0.0;
        }
        let total: f64 = self.texels.iter().map(|t| t.coverage as f64).sum();
        (total / self.texels.len() as f64) as f32
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

/// Sample the field of `balls` over `resolution`.
///
/// Pure: identical inputs give bit-identical output.
pub fn sample(
    balls: &[Ball],
    resolution: Resolution,
    params: &FieldParams,
    aspect: Vec2,
) -> DistanceTexture {
    let texel = resolution.texel_size();
    let mut texels = Vec::with_capacity(resolution.texel_count());

    for y in 0..resolution.height {
        for x in 0..resolution.width {
            let p = resolution.texel_center(x, y);
            let (density, gradient) = evaluate(p, balls, aspect);
            let per_texel = (gradient * texel).length();
            texels.push(FieldTexel {
                density,
                coverage: coverage(density, per_texel, params),
                gradient: gradient.to_array(),
            });
        }
    }

    DistanceTexture { resolution, texels }
}
