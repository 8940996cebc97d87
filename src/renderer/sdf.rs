//! Signed distance primitives used to build the clock glyphs
//!
//! Negative inside, positive outside, in whatever units the inputs use.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a capsule: the segment `a`-`b` thickened by `radius`
pub fn sd_capsule(p: Vec2, a: Vec2, b: Vec2, radius: f32) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length() - radius
}

/// Union of any number of shapes
#[inline]
pub fn sd_union(distances: impl IntoIterator<Item = f32>) -> f32 {
    distances.into_iter().fold(f32::MAX, f32::min)
}
