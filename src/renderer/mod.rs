//! Texture and geometry producers
//!
//! Everything here is CPU-side: the distance texture sampled from the balls,
//! the clock SDF, contour geometry, and the records/descriptors handed to the
//! GPU collaborator.

pub mod distance;
pub mod glyphs;
pub mod gpu;
pub mod marching;
pub mod sdf;
pub mod time_sdf;
pub mod vertex;

pub use distance::{DistanceTexture, FieldTexel, Resolution, sample};
pub use gpu::{BallRecord, ContourGeometry, FieldUniforms, SamplingRequest, TextureRequest};
pub use marching::extract_contour;
pub use time_sdf::{ClockTime, TimeSdfGenerator, TimeTexture, generate};
pub use vertex::MarchingVertex;
