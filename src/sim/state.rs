//! Ball bodies and the simulation state that owns them

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use crate::Viewport;
use crate::config::Config;

/// A single metaball body
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    /// Centre in viewport fractions, [0, 1] on both axes
    pub pos: Vec2,
    /// Viewport fractions per second
    pub vel: Vec2,
    /// Radius as a fraction of the viewport's shorter side
    pub size: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self { id, pos, vel, size }
    }

    /// Radius expressed in each axis' normalized units
    #[inline]
    pub fn extent(&self, aspect: Vec2) -> Vec2 {
        Vec2::splat(self.size) / aspect
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Clamp the ball inside the viewport, pointing velocity back inward.
    ///
    /// Returns true if either axis bounced.
    pub fn contain(&mut self, aspect: Vec2) -> bool {
        let lo = self.extent(aspect).min(Vec2::splat(0.5));
        let hi = Vec2::ONE - lo;
        let mut bounced = false;

        if self.pos.x < lo.x {
            self.pos.x = lo.x;
            self.vel.x = self.vel.x.abs();
            bounced = true;
        } else if self.pos.x > hi.x {
            self.pos.x = hi.x;
            self.vel.x = -self.vel.x.abs();
            bounced = true;
        }

        if self.pos.y < lo.y {
            self.pos.y = lo.y;
            self.vel.y = self.vel.y.abs();
            bounced = true;
        } else if self.pos.y > hi.y {
            self.pos.y = hi.y;
            self.vel.y = -self.vel.y.abs();
            bounced = true;
        }

        bounced
    }
}

/// Complete simulation state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed used to spawn the balls
    pub seed: u64,
    /// Balls, sorted by id
    pub balls: Vec<Ball>,
    /// Current viewport aspect (see `Viewport::aspect`)
    pub aspect: Vec2,
    /// Number of ticks applied
    pub time_ticks: u64,
}

impl SimState {
    /// Spawn `config.ball_count` balls with random position and velocity
    pub fn new(config: &Config, viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let aspect = viewport.aspect();

        let balls = (0..config.ball_count)
            .map(|i| {
                let extent = (Vec2::splat(config.ball_size) / aspect).min(Vec2::splat(0.5));
                let span = Vec2::ONE - 2.0 * extent;
                let pos = extent + span * Vec2::new(rng.random::<f32>(), rng.random::<f32>());

                let theta = rng.random::<f32>() * TAU;
                let magnitude = config.speed * (0.5 + rng.random::<f32>());
                let vel = Vec2::new(theta.cos(), theta.sin()) * magnitude;

                Ball::new(i as u32, pos, vel, config.ball_size)
            })
            .collect();

        log::debug!(
            "Spawned {} balls (seed {}, viewport {}x{})",
            config.ball_count,
            seed,
            viewport.width,
            viewport.height
        );

        Self {
            seed,
            balls,
            aspect,
            time_ticks: 0,
        }
    }

    /// Adopt a new viewport; balls keep their normalized positions but are
    /// pushed back inside if the new aspect makes them overlap an edge.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        for ball in &mut self.balls {
            ball.contain(self.aspect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_count_and_bounds() {
        let config = Config::default();
        let state = SimState::new(&config, Viewport::new(1920, 1080), 42);
        assert_eq!(state.balls.len(), config.ball_count);

        for ball in &state.balls {
            let extent = ball.extent(state.aspect);
            assert!(ball.pos.x >= extent.x && ball.pos.x <= 1.0 - extent.x);
            assert!(ball.pos.y >= extent.y && ball.pos.y <= 1.0 - extent.y);
            let speed = ball.speed();
            assert!(speed >= config.speed * 0.5 - 1e-6 && speed <= config.speed * 1.5 + 1e-6);
        }
    }

    #[test]
    fn test_spawn_is_seeded() {
        let config = Config::default();
        let a = SimState::new(&config, Viewport::new(800, 600), 7);
        let b = SimState::new(&config, Viewport::new(800, 600), 7);
        let c = SimState::new(&config, Viewport::new(800, 600), 8);
        assert_eq!(a.balls, b.balls);
        assert_ne!(a.balls, c.balls);
    }

    #[test]
    fn test_contain_reflects_inward() {
        let aspect = Vec2::ONE;
        let mut ball = Ball::new(0, Vec2::new(-0.2, 1.3), Vec2::new(-0.1, 0.1), 0.1);
        assert!(ball.contain(aspect));
        assert_eq!(ball.pos, Vec2::new(0.1, 0.9));
        assert!(ball.vel.x > 0.0);
        assert!(ball.vel.y < 0.0);

        // Already inside: untouched
        let mut ball = Ball::new(0, Vec2::splat(0.5), Vec2::new(0.1, -0.1), 0.1);
        assert!(!ball.contain(aspect));
        assert_eq!(ball.vel, Vec2::new(0.1, -0.1));
    }

    #[test]
    fn test_set_viewport_reclamps() {
        let config = Config::default();
        // Wide viewport: x extent is 0.1 / 2 = 0.05
        let mut state = SimState::new(&config, Viewport::new(2000, 1000), 3);
        state.balls[0].pos = Vec2::new(0.06, 0.5);
        // Square viewport: x extent grows back to 0.1
        state.set_viewport(Viewport::new(1000, 1000));
        assert!((state.balls[0].pos.x - 0.1).abs() < 1e-6);
        assert_eq!(state.aspect, Vec2::ONE);
    }
}
