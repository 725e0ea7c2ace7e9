//! Spider physics resolver
//!
//! One fixed-timestep step of the spider's kinematics: integration, gravity,
//! zip drag, arena clamping. Pure function of its inputs so the orchestrator
//! can resolve the whole step before touching shared state.

use glam::Vec2;

use crate::consts::*;

/// Outcome of one physics step
#[derive(Debug, Clone, Copy)]
pub struct SpiderStep {
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_jumping: bool,
    pub is_zipping: bool,
    pub is_on_wall: bool,
    /// Set when the spider touched down this step falling faster than the
    /// dust threshold; carries the fall speed for the particle burst.
    pub landed_at_speed: Option<f32>,
}

/// Advance the spider by one tick.
///
/// * Gravity applies only while airborne and not zipping, capped at
///   `MAX_FALL_SPEED`.
/// * Zip velocity decays multiplicatively; under `ZIP_STOP_THRESHOLD` the
///   zip ends on its own.
/// * Position is clamped to the arena; an x clamp while zipping stops the
///   zip dead and zeroes velocity.
/// * `speed_boosted` multiplies only the horizontal contribution (the Speed
///   power-up does not make the spider fall faster).
pub fn step_spider(
    position: Vec2,
    velocity: Vec2,
    is_jumping: bool,
    is_zipping: bool,
    speed_boosted: bool,
    width: f32,
    height: f32,
) -> SpiderStep {
    let ground_y = height - GROUND_HEIGHT;
    let speed_mult = if speed_boosted { SPEED_BOOST_FACTOR } else { 1.0 };

    let mut pos = Vec2::new(position.x + velocity.x * speed_mult, position.y + velocity.y);
    let mut vel = velocity;
    let mut jumping = is_jumping;
    let mut zipping = is_zipping;
    let mut landed_at_speed = None;

    if zipping {
        vel *= ZIP_DRAG;
        if vel.x.abs() < ZIP_STOP_THRESHOLD && vel.y.abs() < ZIP_STOP_THRESHOLD {
            zipping = false;
        }
    } else if jumping || pos.y < ground_y {
        vel.y = (vel.y + GRAVITY).min(MAX_FALL_SPEED);
    }

    let mut hit_wall = false;

    if pos.x < SPIDER_RADIUS {
        pos.x = SPIDER_RADIUS;
        hit_wall = true;
    } else if pos.x > width - SPIDER_RADIUS {
        pos.x = width - SPIDER_RADIUS;
        hit_wall = true;
    }

    if pos.y < SPIDER_RADIUS {
        pos.y = SPIDER_RADIUS;
        hit_wall = true;
    } else if pos.y > ground_y {
        // Touchdown only fires coming from strictly above the line, so a
        // zip hugging the ground keeps zipping and drag winds it down.
        // Fast falls kick up dust.
        let was_airborne = is_jumping || is_zipping;
        let fall_speed = velocity.y.abs();
        if was_airborne && fall_speed > LANDING_DUST_SPEED {
            landed_at_speed = Some(fall_speed);
        }
        pos.y = ground_y;
        vel.y = 0.0;
        jumping = false;
        zipping = false;
    }

    if hit_wall && zipping {
        // A wall stops a zip dead
        zipping = false;
        vel = Vec2::ZERO;
    }

    SpiderStep {
        position: pos,
        velocity: vel,
        is_jumping: jumping,
        is_zipping: zipping,
        is_on_wall: hit_wall && pos.y < ground_y,
        landed_at_speed,
    }
}
