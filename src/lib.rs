//! Spider Hunt - simulation core for a 2D web-slinging arcade game
//!
//! A player-controlled spider hunts flying prey, shoots webs to trap them,
//! and racks up combo-multiplied score. This crate is the game's brain only:
//!
//! - `sim`: deterministic simulation (physics, collisions, entity lifecycles,
//!   combo/difficulty scaling, game-phase state machine)
//! - `highscore`: single-scalar high score persistence
//!
//! Rendering, input-device wiring and audio are the embedder's concern; they
//! call the command methods on [`sim::GameState`] and read the state back
//! each frame.

pub mod highscore;
pub mod sim;

pub use highscore::HighScore;
pub use sim::{GamePhase, GameState};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame interval in milliseconds (60 Hz driver)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Arena defaults (viewport pushes real dimensions via `set_dimensions`)
    pub const DEFAULT_WIDTH: f32 = 1000.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
    /// Height of the ground strip at the bottom of the arena
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Spider collision radius (32 px sprite at 3x scale, halved)
    pub const SPIDER_RADIUS: f32 = 48.0;
    /// Upward velocity applied on jump
    pub const JUMP_FORCE: f32 = 12.0;
    /// Upward velocity applied on the air jump
    pub const DOUBLE_JUMP_FORCE: f32 = 10.0;
    /// Spider-to-prey distance that counts as a catch
    pub const CATCH_RADIUS: f32 = 45.0;

    // Physics. Velocities are per-tick deltas; the tick is fixed-rate so no
    // dt shows up in the integration.
    pub const GRAVITY: f32 = 0.5;
    pub const MAX_FALL_SPEED: f32 = 12.0;
    /// Launch speed of a zip dash
    pub const ZIP_SPEED: f32 = 25.0;
    /// Multiplicative velocity decay per tick while zipping
    pub const ZIP_DRAG: f32 = 0.92;
    /// Speed under which a zip ends
    pub const ZIP_STOP_THRESHOLD: f32 = 2.0;
    /// Zips shorter than this are refused outright
    pub const MIN_ZIP_DISTANCE: f32 = 50.0;
    /// Fall speed above which landing kicks up dust
    pub const LANDING_DUST_SPEED: f32 = 5.0;

    // Webs
    pub const WEB_LIFETIME_MS: f64 = 5000.0;
    /// Active web cap; oldest is evicted first
    pub const WEB_MAX_ACTIVE: usize = 5;
    /// Distance from a web segment at which prey counts as trapped
    pub const WEB_COLLISION_RADIUS: f32 = 25.0;
    /// Segments shorter than this are degenerate and never created
    pub const WEB_MIN_SEGMENT: f32 = 10.0;
    pub const WEB_ENERGY_MAX: f32 = 100.0;
    /// Passive energy regen per tick
    pub const WEB_ENERGY_REGEN: f32 = 0.1;
    pub const WEB_SHOOT_COST: f32 = 20.0;
    pub const WEB_ZIP_COST: f32 = 15.0;
    /// Angle between webs of a multi-shot volley (15 degrees)
    pub const MULTI_SHOT_SPREAD: f32 = std::f32::consts::PI / 12.0;

    // Prey
    pub const PREY_MAX_ON_SCREEN: usize = 8;
    /// How far off-screen prey spawns
    pub const PREY_SPAWN_EDGE_OFFSET: f32 = 50.0;
    /// Prey inside this radius flees the spider
    pub const PREY_FLEE_RADIUS: f32 = 150.0;
    /// Flee speed as a multiple of base speed
    pub const PREY_FLEE_BOOST: f32 = 1.8;
    /// Velocity multiplier applied the moment prey hits a web
    pub const PREY_TRAP_SLOWDOWN: f32 = 0.3;
    /// Per-tick damping while struggling in a web
    pub const PREY_STRUGGLE_DAMPING: f32 = 0.95;

    // Combo
    pub const COMBO_WINDOW_MS: f64 = 3000.0;
    pub const COMBO_CAP: u32 = 10;
    /// Score multiplier slope: 1 + (combo - 1) * rate
    pub const COMBO_BONUS_RATE: f32 = 0.25;

    // Difficulty: 1 + score * rate, capped
    pub const DIFFICULTY_SCALE_RATE: f32 = 0.0002;
    pub const DIFFICULTY_MAX: f32 = 3.0;
    /// Prey speed bonus per difficulty point above 1
    pub const PREY_SPEED_BONUS: f32 = 0.15;
    /// Prey spawn interval at difficulty 1 (scaled down by difficulty)
    pub const PREY_SPAWN_INTERVAL_MS: f64 = 3000.0;
    pub const PREY_SPAWN_INTERVAL_MIN_MS: f64 = 800.0;

    // Power-ups
    pub const POWER_UP_SPAWN_CHANCE: f32 = 0.1;
    pub const POWER_UP_LIFETIME_MS: f64 = 10_000.0;
    pub const POWER_UP_DURATION_MS: f64 = 8000.0;
    pub const POWER_UP_COLLECT_RADIUS: f32 = 40.0;
    /// Horizontal speed multiplier while Speed is active
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;
    /// Prey inside this radius drifts toward the spider while Magnet is active
    pub const MAGNET_RADIUS: f32 = 200.0;
    /// Magnet pull strength per tick
    pub const MAGNET_PULL: f32 = 0.5;
    /// Instant energy restored by a WebEnergy pickup
    pub const WEB_ENERGY_REFILL: f32 = 50.0;
    /// Prey integration rate while SlowTime is active
    pub const SLOW_TIME_FACTOR: f32 = 0.5;

    // Visual feedback
    pub const SCORE_POPUP_MS: f64 = 1000.0;
    pub const FREEZE_FRAME_MS: f64 = 100.0;
    pub const SCREEN_FLASH_MS: f64 = 300.0;
    /// Multiplicative screen-shake decay per tick
    pub const SCREEN_SHAKE_DECAY: f32 = 0.85;
}

/// Unit vector pointing at `theta` radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Clamp a position to the playable arena for a body of the given radius.
///
/// X is clamped to `[radius, width - radius]`, y to `[radius, ground line]`.
/// Idempotent: clamping twice equals clamping once.
#[inline]
pub fn clamp_to_arena(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, width - radius),
        pos.y.clamp(radius, height - consts::GROUND_HEIGHT),
    )
}
