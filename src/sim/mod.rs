//! Deterministic simulation module
//!
//! Ball physics and the implicit density field. This module must stay pure:
//! - Caller-supplied elapsed time only
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod field;
pub mod state;
pub mod tick;

pub use field::{FieldParams, coverage, density, density_gradient, evaluate};
pub use state::{Ball, SimState};
pub use tick::{regulate_speed, sanitize_elapsed, tick};
