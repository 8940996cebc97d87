//! Silhouette extraction as line geometry (marching squares)
//!
//! Cells are formed by four neighbouring texel centres. Crossings are placed by
//! linear interpolation along the cell edge; the two saddle cases are resolved
//! with the average of the four corners.

use glam::Vec2;

use super::distance::DistanceTexture;
use super::vertex::MarchingVertex;

#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Segments for each of the 16 corner configurations.
///
/// Bits: 8 = top-left, 4 = top-right, 2 = bottom-right, 1 = bottom-left.
/// Saddles (5, 10) are handled separately.
const EDGE_TABLE: [&[(Edge, Edge)]; 16] = {
    use Edge::*;
    [
        &[],
        &[(Left, Bottom)],
        &[(Bottom, Right)],
        &[(Left, Right)],
        &[(Top, Right)],
        &[],
        &[(Top, Bottom)],
        &[(Left, Top)],
        &[(Left, Top)],
        &[(Top, Bottom)],
        &[],
        &[(Top, Right)],
        &[(Left, Right)],
        &[(Bottom, Right)],
        &[(Left, Bottom)],
        &[],
    ]
};

fn saddle(case: usize, center_inside: bool) -> &'static [(Edge, Edge)] {
    use Edge::*;
    match (case, center_inside) {
        // top-right and bottom-left inside
        (5, true) => &[(Left, Top), (Bottom, Right)],
        (5, false) => &[(Top, Right), (Left, Bottom)],
        // top-left and bottom-right inside
        (10, true) => &[(Top, Right), (Left, Bottom)],
        (10, false) => &[(Left, Top), (Bottom, Right)],
        _ => &[],
    }
}

/// Where the iso crossing sits between two samples, as a 0..1 fraction
#[inline]
fn crossing(a: f32, b: f32, threshold: f32) -> f32 {
    let denom = b - a;
    if denom.abs() <= f32::EPSILON {
        0.5
    } else {
        ((threshold - a) / denom).clamp(0.0, 1.0)
    }
}

/// Extract the `threshold` iso-line of the texture's density as a line list
/// (two vertices per segment) in normalized viewport coordinates.
pub fn extract_contour(
    texture: &DistanceTexture,
    threshold: f32,
    color: [f32; 4],
) -> Vec<MarchingVertex> {
    let res = texture.resolution;
    let mut vertices = Vec::new();
    if res.width < 2 || res.height < 2 {
        return vertices;
    }

    let texel = res.texel_size();
    for y in 0..res.height - 1 {
        for x in 0..res.width - 1 {
            let tl = texture.get(x, y).density;
            let tr = texture.get(x + 1, y).density;
            let br = texture.get(x + 1, y + 1).density;
            let bl = texture.get(x, y + 1).density;

            let mut case = 0;
            if tl >= threshold {
                case |= 8;
            }
            if tr >= threshold {
                case |= 4;
            }
            if br >= threshold {
                case |= 2;
            }
            if bl >= threshold {
                case |= 1;
            }

            let segments = if case == 5 || case == 10 {
                saddle(case, (tl + tr + br + bl) * 0.25 >= threshold)
            } else {
                EDGE_TABLE[case]
            };
            if segments.is_empty() {
                continue;
            }

            let origin = res.texel_center(x, y);
            let point = |edge: Edge| -> Vec2 {
                let local = match edge {
                    Edge::Top => Vec2::new(crossing(tl, tr, threshold), 0.0),
                    Edge::Right => Vec2::new(1.0, crossing(tr, br, threshold)),
                    Edge::Bottom => Vec2::new(crossing(bl, br, threshold), 1.0),
                    Edge::Left => Vec2::new(0.0, crossing(tl, bl, threshold)),
                };
                origin + local * texel
            };

            for &(a, b) in segments {
                let (pa, pb) = (point(a), point(b));
                vertices.push(MarchingVertex::new(pa.x, pa.y, color));
                vertices.push(MarchingVertex::new(pb.x, pb.y, color));
            }
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::renderer::distance::{Resolution, sample};
    use crate::renderer::vertex::colors;
    use crate::sim::{Ball, FieldParams, density};

    #[test]
    fn test_empty_field_has_no_contour() {
        let params = FieldParams::from(&Config::default());
        let tex = sample(&[], Resolution::new(16, 16), &params, Vec2::ONE);
        assert!(extract_contour(&tex, params.threshold, colors::CONTOUR).is_empty());
    }

    #[test]
    fn test_single_ball_contour_is_a_ring() {
        let params = FieldParams::from(&Config::default());
        let balls = [Ball::new(0, Vec2::splat(0.5), Vec2::ZERO, 0.1)];
        let tex = sample(&balls, Resolution::new(64, 64), &params, Vec2::ONE);
        let verts = extract_contour(&tex, params.threshold, colors::CONTOUR);

        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 2, 0);

        // Every vertex lies close to the analytic iso radius
        let expected = 0.1 * (1.0f32 / params.threshold).ln().sqrt();
        for v in &verts {
            let p = Vec2::from_array(v.position);
            let r = (p - Vec2::splat(0.5)).length();
            assert!((r - expected).abs() < 0.01, "radius {r} vs {expected}");
            let d = density(p, &balls, Vec2::ONE);
            assert!((d - params.threshold).abs() < 0.03);
        }
    }

    #[test]
    fn test_crossing_interpolation() {
        assert_eq!(crossing(0.0, 1.0, 0.25), 0.25);
        assert_eq!(crossing(1.0, 0.0, 0.25), 0.75);
        assert_eq!(crossing(0.5, 0.5, 0.5), 0.5);
    }
}
