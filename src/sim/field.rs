//! Implicit density field
//!
//! Each ball contributes a Gaussian bump `exp(-d² / size²)`, with `d` measured
//! in shorter-side units so blobs stay round on non-square viewports. The
//! silhouette is the locus where the summed density equals the threshold.

use glam::Vec2;

use super::state::Ball;
use crate::config::{AaBand, Config};
use crate::smoothstep;

/// Everything needed to turn a density into coverage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub threshold: f32,
    pub edge_hardness: f32,
    pub aa_band: AaBand,
}

impl From<&Config> for FieldParams {
    fn from(config: &Config) -> Self {
        Self {
            threshold: config.threshold,
            edge_hardness: config.edge_hardness,
            aa_band: config.aa_band,
        }
    }
}

/// Contribution of one ball at squared distance `dist_sq`
#[inline]
pub fn falloff(dist_sq: f32, size: f32) -> f32 {
    (-dist_sq / (size * size)).exp()
}

/// Summed density at `point` (normalized viewport coordinates)
pub fn density(point: Vec2, balls: &[Ball], aspect: Vec2) -> f32 {
    balls
        .iter()
        .map(|ball| falloff(((point - ball.pos) * aspect).length_squared(), ball.size))
        .sum()
}

/// Gradient of `density` with respect to normalized coordinates
pub fn density_gradient(point: Vec2, balls: &[Ball], aspect: Vec2) -> Vec2 {
    evaluate(point, balls, aspect).1
}

/// Density and its gradient in a single pass over the balls
pub fn evaluate(point: Vec2, balls: &[Ball], aspect: Vec2) -> (f32, Vec2) {
    let aspect_sq = aspect * aspect;
    balls.iter().fold((0.0, Vec2::ZERO), |(sum, grad), ball| {
        let delta = point - ball.pos;
        let inv_size_sq = 1.0 / (ball.size * ball.size);
        let f = falloff((delta * aspect).length_squared(), ball.size);
        (sum + f, grad - 2.0 * f * inv_size_sq * aspect_sq * delta)
    })
}

/// Coverage (alpha) of a sample with the given density.
///
/// `gradient_per_texel` is how much the density changes across one texel. The
/// transition band on each side of the threshold is the wider of the edge
/// hardness and the AA band offset converted into density units, so the edge
/// never collapses to a single hard texel.
pub fn coverage(density: f32, gradient_per_texel: f32, params: &FieldParams) -> f32 {
    let below = params
        .edge_hardness
        .max(-params.aa_band.start * gradient_per_texel);
    let above = params.edge_hardness.max(params.aa_band.end * gradient_per_texel);
    smoothstep(params.threshold - below, params.threshold + above, density)
}
