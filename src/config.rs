//! Simulation and rendering configuration
//!
//! One immutable struct passed to `Engine::initialize`. `Default` is the stock
//! constant set; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Antialiasing band around the iso crossing, in texels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AaBand {
    /// Offset of the outer edge of the band (negative = outside the blob)
    pub start: f32,
    /// Offset of the inner edge of the band
    pub end: f32,
}

impl Default for AaBand {
    fn default() -> Self {
        Self {
            start: AA_START,
            end: AA_END,
        }
    }
}

impl AaBand {
    /// Total width of the band in texels
    pub fn width(&self) -> f32 {
        self.end - self.start
    }
}

/// Complete configuration for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Balls ===
    pub ball_count: usize,
    /// Radius as a fraction of the viewport's shorter side
    pub ball_size: f32,
    /// Density iso-value of the silhouette
    pub threshold: f32,
    /// Target speed in viewport fractions per second
    pub speed: f32,
    /// Proportional gain of the speed regulator (per second)
    pub velocity_gain: f32,

    // === Field shading ===
    /// Half-width of the soft band around `threshold`, in density units
    pub edge_hardness: f32,
    pub aa_band: AaBand,

    // === Resolution ===
    /// Distance texture downscale factor
    pub distance_render_scale: u32,
    /// Time texture downscale factor
    pub time_render_scale: u32,
    /// Marching squares cell size (fraction of viewport)
    pub square_size: f32,

    // === Clock ===
    /// Clock glyph height as a fraction of viewport height
    pub clock_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ball_count: NUM_BALLS,
            ball_size: BALL_SIZE,
            threshold: BALL_THRESH,
            speed: BALL_SPEED,
            velocity_gain: VELCLAMP_KP,

            edge_hardness: EDGE_HARDNESS,
            aa_band: AaBand::default(),

            distance_render_scale: DIST_RENDER_SCALE,
            time_render_scale: TIME_RENDER_SCALE,
            square_size: SQUARE_SIZE,

            clock_height: CLOCK_HEIGHT,
        }
    }
}

impl Config {
    /// Parse a JSON override on top of the defaults and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject constant combinations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ball_count == 0 || self.ball_count > MAX_BALLS {
            return Err(Error::config(format!(
                "ball_count must be in 1..={}, got {}",
                MAX_BALLS, self.ball_count
            )));
        }
        if !(self.ball_size > 0.0 && self.ball_size < 0.5) {
            return Err(Error::config(format!(
                "ball_size must be in (0, 0.5), got {}",
                self.ball_size
            )));
        }
        if !(self.threshold > 0.0 && self.threshold.is_finite()) {
            return Err(Error::config(format!(
                "threshold must be > 0, got {}",
                self.threshold
            )));
        }
        if !(self.speed >= 0.0 && self.speed.is_finite()) {
            return Err(Error::config(format!(
                "speed must be finite and >= 0, got {}",
                self.speed
            )));
        }
        if !(self.velocity_gain >= 0.0 && self.velocity_gain.is_finite()) {
            return Err(Error::config(format!(
                "velocity_gain must be finite and >= 0, got {}",
                self.velocity_gain
            )));
        }
        if !(self.edge_hardness > 0.0 && self.edge_hardness.is_finite()) {
            return Err(Error::config(format!(
                "edge_hardness must be > 0, got {}",
                self.edge_hardness
            )));
        }
        if !(self.aa_band.start < self.aa_band.end) {
            return Err(Error::config(format!(
                "aa_band start ({}) must be below end ({})",
                self.aa_band.start, self.aa_band.end
            )));
        }
        if self.distance_render_scale == 0 || self.time_render_scale == 0 {
            return Err(Error::config("render scales must be >= 1"));
        }
        if !(self.square_size > 0.0 && self.square_size <= 1.0) {
            return Err(Error::config(format!(
                "square_size must be in (0, 1], got {}",
                self.square_size
            )));
        }
        if !(self.clock_height > 0.0 && self.clock_height <= 1.0) {
            return Err(Error::config(format!(
                "clock_height must be in (0, 1], got {}",
                self.clock_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ball_count, 5);
        assert_eq!(config.threshold, 0.15);
    }

    #[test]
    fn test_rejects_zero_balls() {
        let config = Config {
            ball_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_ball_count_limited_to_record_slots() {
        let full = Config {
            ball_count: MAX_BALLS,
            ..Default::default()
        };
        assert!(full.validate().is_ok());

        let over = Config {
            ball_count: MAX_BALLS + 1,
            ..Default::default()
        };
        assert!(matches!(
            over.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        for threshold in [0.0, -0.1, f32::NAN] {
            let config = Config {
                threshold,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "threshold {threshold} accepted");
        }
    }

    #[test]
    fn test_rejects_inverted_aa_band() {
        let config = Config {
            aa_band: AaBand {
                start: 1.0,
                end: -1.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = Config::from_json(r#"{ "ball_count": 8, "speed": 0.2 }"#).unwrap();
        assert_eq!(config.ball_count, 8);
        assert_eq!(config.speed, 0.2);
        assert_eq!(config.ball_size, BALL_SIZE);
    }

    #[test]
    fn test_from_json_validates() {
        let err = Config::from_json(r#"{ "ball_size": 0.75 }"#).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = Config::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
