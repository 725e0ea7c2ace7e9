//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (the driver calls `tick()` once per frame)
//! - Seeded RNG only
//! - Single writer: all mutation goes through the command methods and `tick()`
//! - No rendering or platform dependencies
//!
//! Durations ("reset shake after N ms", power-up expiry, freeze frames) are
//! state with remaining time, decremented each tick - never scheduled
//! callbacks - so a run is replayable from its seed and command sequence.

pub mod actions;
pub mod collision;
pub mod particles;
pub mod physics;
pub mod prey;
pub mod state;
pub mod tick;

pub use collision::{closest_point_on_segment, point_near_segment};
pub use particles::{Particle, ParticleKind, ParticlePreset};
pub use prey::{Behavior, Prey, PreyConfig, PreyKind};
pub use state::{
    ActivePowerUp, Direction, GamePhase, GameState, PowerUp, PowerUpKind, ScorePopup, ScreenFlash,
    Web,
};
