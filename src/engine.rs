//! Host-facing engine
//!
//! The rendering host drives one `on_frame` per displayed frame: the balls are
//! ticked once, the distance texture is sampled once, and the clock texture is
//! regenerated only when the displayed minute (or its size) changes.

use std::num::NonZeroU32;

use chrono::Timelike;

use crate::Viewport;
use crate::config::Config;
use crate::error::Result;
use crate::renderer::gpu::{self, BallRecord, ContourGeometry, FieldUniforms, SamplingRequest};
use crate::renderer::vertex::colors;
use crate::renderer::{
    ClockTime, DistanceTexture, Resolution, TimeSdfGenerator, TimeTexture, extract_contour, sample,
};
use crate::sim::{FieldParams, SimState, tick};

/// Source of the displayed hour and minute
pub trait WallClock {
    /// Raw (hour, minute); validated by the engine
    fn now(&self) -> (u32, u32);
}

/// Local wall-clock time of the host, following its time zone and DST rules
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> (u32, u32) {
        let now = chrono::Local::now();
        (now.hour(), now.minute())
    }
}

/// Always reports the same time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub hour: u32,
    pub minute: u32,
}

impl FixedClock {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> (u32, u32) {
        (self.hour, self.minute)
    }
}

/// Clock texture state for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUpdate<'a> {
    /// A new texture was produced this frame
    Updated(&'a TimeTexture),
    /// Keep using the previously delivered texture
    Unchanged,
}

/// Output of one `on_frame`
#[derive(Debug)]
pub struct Frame<'a> {
    pub distance: DistanceTexture,
    pub time: TimeUpdate<'a>,
}

/// Height in texels of the clock texture for a viewport, at least 1
pub fn time_texture_height(config: &Config, viewport: Viewport) -> NonZeroU32 {
    let pixels = viewport.height as f32 * config.clock_height;
    let texels = (pixels / config.time_render_scale.max(1) as f32).round() as u32;
    NonZeroU32::new(texels).unwrap_or(NonZeroU32::MIN)
}

/// One independent metaball simulation plus its textures
pub struct Engine {
    config: Config,
    params: FieldParams,
    viewport: Viewport,
    sim: SimState,
    clock: Box<dyn WallClock>,
    time_generator: TimeSdfGenerator,
    time_texture: Option<TimeTexture>,
    frames: u64,
}

impl Engine {
    /// Validate `config` and spawn the balls. Nothing is built on error.
    pub fn initialize(config: Config, viewport: Viewport, seed: u64) -> Result<Self> {
        config.validate()?;
        let time_generator = TimeSdfGenerator::with_height(time_texture_height(&config, viewport));
        let sim = SimState::new(&config, viewport, seed);

        log::info!(
            "Metaballs initialized: {} balls, viewport {}x{}, seed {}",
            config.ball_count,
            viewport.width,
            viewport.height,
            seed
        );

        Ok(Self {
            params: FieldParams::from(&config),
            clock: Box::new(SystemClock),
            config,
            viewport,
            sim,
            time_generator,
            time_texture: None,
            frames: 0,
        })
    }

    /// Replace the wall clock
    pub fn with_clock(mut self, clock: impl WallClock + 'static) -> Self {
        self.set_clock(clock);
        self
    }

    pub fn set_clock(&mut self, clock: impl WallClock + 'static) {
        self.clock = Box::new(clock);
    }

    /// Advance the simulation and produce this frame's textures
    pub fn on_frame(&mut self, elapsed: f32, viewport: Viewport) -> Frame<'_> {
        if viewport != self.viewport {
            self.on_resize(viewport);
        }

        tick(&mut self.sim, &self.config, elapsed);
        let distance = sample(
            &self.sim.balls,
            self.distance_resolution(),
            &self.params,
            self.sim.aspect,
        );
        self.frames += 1;

        let time = if self.refresh_time() {
            match &self.time_texture {
                Some(texture) => TimeUpdate::Updated(texture),
                None => TimeUpdate::Unchanged,
            }
        } else {
            TimeUpdate::Unchanged
        };

        Frame { distance, time }
    }

    /// Adopt a new viewport size
    pub fn on_resize(&mut self, viewport: Viewport) {
        log::info!(
            "Viewport resized {}x{} -> {}x{}",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        self.sim.set_viewport(viewport);

        let height = time_texture_height(&self.config, viewport);
        if height.get() != self.time_generator.layout().height {
            self.time_generator = TimeSdfGenerator::with_height(height);
        }
    }

    /// Regenerate the clock texture if the displayed time or size changed.
    ///
    /// Returns true if a new texture was produced. An invalid time from the
    /// clock keeps the previous texture.
    fn refresh_time(&mut self) -> bool {
        let (hour, minute) = self.clock.now();
        let time = match ClockTime::new(hour, minute) {
            Ok(time) => time,
            Err(e) => {
                log::warn!("{e}; keeping previous clock texture");
                return false;
            }
        };

        let height = self.time_generator.layout().height;
        let current = self
            .time_texture
            .as_ref()
            .is_some_and(|t| t.time == time && t.height() == height);
        if current {
            return false;
        }

        self.time_texture = Some(self.time_generator.render(time));
        log::debug!("Clock texture regenerated for {time}");
        true
    }

    pub fn distance_resolution(&self) -> Resolution {
        Resolution::scaled(self.viewport, self.config.distance_render_scale)
    }

    /// Texture sizes and slots for the GPU collaborator
    pub fn sampling_request(&self) -> SamplingRequest {
        let layout = self.time_generator.layout();
        SamplingRequest::new(self.distance_resolution(), layout.width(), layout.height)
    }

    /// Per-ball records for the ball buffer
    pub fn ball_records(&self) -> Vec<BallRecord> {
        gpu::ball_records(&self.sim.balls)
    }

    pub fn field_uniforms(&self) -> FieldUniforms {
        FieldUniforms::new(&self.config, self.distance_resolution(), self.sim.balls.len())
    }

    /// Silhouette as line geometry, sampled on the marching-squares grid
    pub fn contour(&self) -> ContourGeometry {
        let resolution = Resolution::from_square_size(self.viewport, self.config.square_size);
        let field = sample(&self.sim.balls, resolution, &self.params, self.sim.aspect);
        ContourGeometry::new(extract_contour(
            &field,
            self.config.threshold,
            colors::CONTOUR,
        ))
    }

    /// Most recent clock texture, if one has been produced
    pub fn time_texture(&self) -> Option<&TimeTexture> {
        self.time_texture.as_ref()
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
