//! Per-frame simulation tick
//!
//! Explicit Euler with edge reflection and a soft speed regulator.

use glam::Vec2;

use super::state::SimState;
use crate::config::Config;

/// Clamp caller-supplied elapsed time to something safe to integrate with
#[inline]
pub fn sanitize_elapsed(elapsed: f32) -> f32 {
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed
    } else {
        0.0
    }
}

/// Nudge the velocity magnitude toward `target` (proportional control).
///
/// `vel += kp * (target - |vel|) * normalize(vel) * dt`. The step `kp * dt` is
/// capped at 1 so a long frame lands on the target instead of overshooting.
/// A zero velocity has no direction and is left alone.
pub fn regulate_speed(vel: &mut Vec2, target: f32, kp: f32, dt: f32) {
    let speed = vel.length();
    if speed <= f32::EPSILON {
        return;
    }
    let step = (kp * dt).min(1.0);
    *vel += (*vel / speed) * (step * (target - speed));
}

/// Advance every ball by `elapsed` seconds
pub fn tick(state: &mut SimState, config: &Config, elapsed: f32) {
    let dt = sanitize_elapsed(elapsed);
    if dt != elapsed {
        log::warn!("Ignoring invalid elapsed time {elapsed}");
    }

    let aspect = state.aspect;
    for ball in &mut state.balls {
        regulate_speed(&mut ball.vel, config.speed, config.velocity_gain, dt);
        ball.pos += ball.vel * dt;
        if ball.contain(aspect) {
            log::trace!("Ball {} bounced at {:?}", ball.id, ball.pos);
        }
    }

    state.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::Ball;
    use proptest::prelude::*;

    fn single_ball_state(pos: Vec2, vel: Vec2) -> SimState {
        let config = Config {
            ball_count: 1,
            ..Default::default()
        };
        let mut state = SimState::new(&config, Viewport::new(1000, 1000), 0);
        state.balls[0] = Ball::new(0, pos, vel, config.ball_size);
        state
    }

    #[test]
    fn test_euler_step() {
        let config = Config {
            velocity_gain: 0.0,
            ..Default::default()
        };
        let mut state = single_ball_state(Vec2::splat(0.5), Vec2::new(0.1, -0.05));
        tick(&mut state, &config, 0.5);
        assert!((state.balls[0].pos - Vec2::new(0.55, 0.475)).length() < 1e-6);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_negative_elapsed_is_ignored() {
        let config = Config::default();
        let mut state = single_ball_state(Vec2::splat(0.5), Vec2::new(0.1, 0.0));
        tick(&mut state, &config, -1.0);
        tick(&mut state, &config, f32::NAN);
        assert_eq!(state.balls[0].pos, Vec2::splat(0.5));
        assert_eq!(state.balls[0].vel, Vec2::new(0.1, 0.0));
    }

    #[test]
    fn test_wall_bounce() {
        let config = Config {
            velocity_gain: 0.0,
            ..Default::default()
        };
        let mut state = single_ball_state(Vec2::new(0.85, 0.5), Vec2::new(0.2, 0.0));
        tick(&mut state, &config, 0.5);
        let ball = &state.balls[0];
        assert!((ball.pos.x - 0.9).abs() < 1e-6);
        assert!(ball.vel.x < 0.0);
        // Elastic: magnitude preserved
        assert!((ball.speed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_regulate_converges_to_target() {
        for start in [0.01f32, 0.05, 0.3, 1.0] {
            let mut vel = Vec2::new(start * 0.6, start * 0.8);
            for _ in 0..900 {
                regulate_speed(&mut vel, 0.1, 0.5, 1.0 / 60.0);
            }
            assert!(
                (vel.length() - 0.1).abs() < 0.005,
                "start {start} ended at {}",
                vel.length()
            );
            // Direction is untouched
            assert!((vel.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-4);
        }
    }

    #[test]
    fn test_regulate_is_soft() {
        // One frame moves part of the way, not all of it
        let mut vel = Vec2::new(0.3, 0.0);
        regulate_speed(&mut vel, 0.1, 0.5, 1.0 / 60.0);
        assert!(vel.x < 0.3 && vel.x > 0.29);
    }

    #[test]
    fn test_regulate_long_frame_does_not_overshoot() {
        let mut vel = Vec2::new(0.01, 0.0);
        regulate_speed(&mut vel, 0.1, 0.5, 10.0);
        assert!((vel.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_regulate_zero_velocity() {
        let mut vel = Vec2::ZERO;
        regulate_speed(&mut vel, 0.1, 0.5, 1.0);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_tick_speed_converges_without_walls() {
        // Tiny, slow ball in the middle never reaches an edge in 10 seconds
        let config = Config {
            speed: 0.02,
            ball_size: 0.01,
            ..Default::default()
        };
        let mut state = single_ball_state(Vec2::splat(0.5), Vec2::new(0.0, 0.01));
        state.balls[0].size = config.ball_size;
        for _ in 0..600 {
            tick(&mut state, &config, 1.0 / 60.0);
        }
        assert!((state.balls[0].speed() - 0.02).abs() < 0.001);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10_000))]

        #[test]
        fn tick_keeps_balls_on_screen(
            seed in any::<u64>(),
            width in 1u32..4000,
            height in 1u32..4000,
            elapsed in 0.0f32..=10.0,
            vx in -5.0f32..5.0,
            vy in -5.0f32..5.0,
        ) {
            let config = Config::default();
            let mut state = SimState::new(&config, Viewport::new(width, height), seed);
            state.balls[0].vel = Vec2::new(vx, vy);
            tick(&mut state, &config, elapsed);
            for ball in &state.balls {
                prop_assert!((0.0..=1.0).contains(&ball.pos.x), "x = {}", ball.pos.x);
                prop_assert!((0.0..=1.0).contains(&ball.pos.y), "y = {}", ball.pos.y);
            }
        }
    }
}
