//! Data handed to the GPU collaborator
//!
//! Pipeline creation and presentation live with the host. This module only
//! defines the records, slot numbers and texture descriptors both sides agree
//! on, plus the upload helper.

use bytemuck::{Pod, Zeroable};

use super::distance::Resolution;
use super::vertex::MarchingVertex;
use crate::config::Config;
use crate::consts::slots;
use crate::sim::Ball;

pub use crate::consts::MAX_BALLS;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

/// Per-ball record, one per fixed slot
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BallRecord {
    pub position: [f32; 2], // offset 0
    pub size: f32,          // offset 8
    pub _pad0: f32,         // offset 12 - align velocity to 8 bytes
    pub velocity: [f32; 2], // offset 16
    pub _pad1: [f32; 2],    // pad to 32 bytes
}

impl From<&Ball> for BallRecord {
    fn from(ball: &Ball) -> Self {
        Self {
            position: ball.pos.to_array(),
            size: ball.size,
            _pad0: 0.0,
            velocity: ball.vel.to_array(),
            _pad1: [0.0; 2],
        }
    }
}

/// Pack balls into records. `Config::validate` caps the count at `MAX_BALLS`.
pub fn ball_records(balls: &[Ball]) -> Vec<BallRecord> {
    debug_assert!(balls.len() <= MAX_BALLS);
    balls.iter().map(BallRecord::from).collect()
}

/// Field shading parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FieldUniforms {
    pub resolution: [f32; 2], // offset 0
    pub threshold: f32,       // offset 8
    pub edge_hardness: f32,   // offset 12
    pub aa_start: f32,        // offset 16
    pub aa_end: f32,          // offset 20
    pub ball_count: u32,      // offset 24
    pub _pad: u32,            // pad to 32 bytes
}

impl FieldUniforms {
    pub fn new(config: &Config, resolution: Resolution, ball_count: usize) -> Self {
        Self {
            resolution: [resolution.width as f32, resolution.height as f32],
            threshold: config.threshold,
            edge_hardness: config.edge_hardness,
            aa_start: config.aa_band.start,
            aa_end: config.aa_band.end,
            ball_count: ball_count as u32,
            _pad: 0,
        }
    }
}

// ============================================================================
// TEXTURE REQUESTS
// ============================================================================

/// One texture the core wants the collaborator to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRequest {
    pub slot: u32,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl TextureRequest {
    pub fn distance(resolution: Resolution) -> Self {
        Self {
            slot: slots::DIST_TEXTURE,
            width: resolution.width,
            height: resolution.height,
            format: wgpu::TextureFormat::Rgba32Float,
        }
    }

    pub fn time(width: u32, height: u32) -> Self {
        Self {
            slot: slots::TIME_TEXTURE,
            width,
            height,
            format: wgpu::TextureFormat::R32Float,
        }
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width.max(1),
            height: self.height.max(1),
            depth_or_array_layers: 1,
        }
    }

    /// Bytes per texel for the requested format
    pub fn bytes_per_texel(&self) -> u32 {
        match self.format {
            wgpu::TextureFormat::Rgba32Float => 16,
            wgpu::TextureFormat::R32Float => 4,
            other => other.block_copy_size(None).unwrap_or(4),
        }
    }

    pub fn descriptor<'a>(&self, label: &'a str) -> wgpu::TextureDescriptor<'a> {
        wgpu::TextureDescriptor {
            label: Some(label),
            size: self.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        }
    }

    /// Bytes in one full upload
    pub fn byte_len(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.bytes_per_texel() as u64
    }

    /// Upload a full texture worth of bytes
    pub fn write(&self, queue: &wgpu::Queue, texture: &wgpu::Texture, data: &[u8]) {
        let expected = self.byte_len();
        let Some(bytes_per_row) = self.width.checked_mul(self.bytes_per_texel()) else {
            log::warn!("Texture slot {} row exceeds u32 bytes; skipping upload", self.slot);
            return;
        };
        if data.len() as u64 != expected {
            log::warn!(
                "Texture slot {} expects {} bytes, got {}; skipping upload",
                self.slot,
                expected,
                data.len()
            );
            return;
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(self.height),
            },
            self.extent(),
        );
    }
}

/// Everything the collaborator needs to bind and size this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingRequest {
    /// Slot of the `BallRecord` buffer
    pub ball_slot: u32,
    pub distance: TextureRequest,
    pub time: TextureRequest,
}

impl SamplingRequest {
    pub fn new(distance: Resolution, time_width: u32, time_height: u32) -> Self {
        Self {
            ball_slot: slots::DIST_FRAGMENT_IN_BALLS,
            distance: TextureRequest::distance(distance),
            time: TextureRequest::time(time_width, time_height),
        }
    }
}

/// Contour line list and the vertex buffer slot it binds to
#[derive(Debug, Clone, PartialEq)]
pub struct ContourGeometry {
    pub slot: u32,
    pub vertices: Vec<MarchingVertex>,
}

impl ContourGeometry {
    pub fn new(vertices: Vec<MarchingVertex>) -> Self {
        Self {
            slot: slots::VERTEX_IN_VERTICES,
            vertices,
        }
    }

    /// Vertex buffer layout the shading layer binds this geometry with
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'static> {
        MarchingVertex::desc()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_record_layout() {
        assert_eq!(std::mem::size_of::<BallRecord>(), 32);
        assert_eq!(std::mem::size_of::<FieldUniforms>(), 32);
    }

    #[test]
    fn test_record_from_ball() {
        let ball = Ball::new(3, Vec2::new(0.25, 0.75), Vec2::new(0.1, -0.2), 0.1);
        let record = BallRecord::from(&ball);
        assert_eq!(record.position, [0.25, 0.75]);
        assert_eq!(record.size, 0.1);
        assert_eq!(record.velocity, [0.1, -0.2]);
    }

    #[test]
    fn test_records_cover_every_ball() {
        let balls: Vec<Ball> = (0..MAX_BALLS as u32)
            .map(|i| Ball::new(i, Vec2::splat(0.5), Vec2::ZERO, 0.1))
            .collect();
        let records = ball_records(&balls);
        assert_eq!(records.len(), MAX_BALLS);
        let uniforms = FieldUniforms::new(&Config::default(), Resolution::new(4, 4), balls.len());
        assert_eq!(uniforms.ball_count as usize, records.len());
    }

    #[test]
    fn test_byte_len_does_not_overflow() {
        let tall = TextureRequest::distance(Resolution::new(70_000, 70_000));
        assert_eq!(tall.byte_len(), 70_000u64 * 70_000 * 16);
    }

    #[test]
    fn test_contour_layout() {
        let contour = ContourGeometry::new(vec![MarchingVertex::new(0.5, 0.5, [1.0; 4])]);
        let layout = contour.layout();
        assert_eq!(layout.array_stride as usize, contour.as_bytes().len());
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn test_texture_requests() {
        let dist = TextureRequest::distance(Resolution::new(480, 270));
        assert_eq!(dist.slot, slots::DIST_TEXTURE);
        assert_eq!(dist.bytes_per_texel(), 16);
        let desc = dist.descriptor("distance");
        assert_eq!(desc.size.width, 480);
        assert_eq!(desc.format, wgpu::TextureFormat::Rgba32Float);

        let time = TextureRequest::time(171, 64);
        assert_eq!(time.slot, slots::TIME_TEXTURE);
        assert_eq!(time.bytes_per_texel(), 4);
        assert_ne!(dist.slot, time.slot);
    }

    #[test]
    fn test_sampling_request() {
        let req = SamplingRequest::new(Resolution::new(10, 5), 171, 64);
        assert_eq!(req.ball_slot, slots::DIST_FRAGMENT_IN_BALLS);
        assert_eq!(req.distance.extent().width, 10);
        assert_eq!(req.time.extent().height, 64);
    }
}
