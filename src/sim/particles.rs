//! Cosmetic particles: presets, batch factories, per-tick integration
//!
//! Particles never feed back into gameplay; the lifecycle manager owns them
//! and the renderer reads them. Everything here is driven off the simulation
//! clock and the seeded RNG so replays stay bit-identical.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::unit_from_angle;

/// Live particle cap; oldest are evicted first
pub const MAX_PARTICLES: usize = 256;

/// Per-effect batch sizes
pub const CATCH_COUNT: usize = 12;
pub const ZIP_COUNT: usize = 6;
pub const WEB_SHOOT_COUNT: usize = 5;
pub const POWER_UP_COUNT: usize = 15;
pub const CONFETTI_COUNT: usize = 30;
pub const RING_COUNT: usize = 12;
/// Chance per tick of a trail particle while crawling/jumping (always 1 while zipping)
pub const TRAIL_CHANCE: f32 = 0.3;

/// Render-side particle category (picks sprite/color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Trail,
    Catch,
    Web,
    Sparkle,
    Combo,
    Confetti,
    Ring,
    Landing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub lifetime_ms: f64,
    pub created_at_ms: f64,
    pub kind: ParticleKind,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Per-tick downward pull; confetti and catch bursts fall, trails do not
    pub gravity: f32,
}

impl Particle {
    #[inline]
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.created_at_ms >= self.lifetime_ms
    }
}

/// Effect presets, one per trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticlePreset {
    Zip,
    WebShoot,
    Catch,
    Combo,
    PowerUp,
    Trail,
    Confetti,
    Landing,
}

struct PresetConfig {
    velocity_spread: f32,
    velocity_bias: Vec2,
    base_size: f32,
    size_variance: f32,
    lifetime_ms: f64,
    kind: ParticleKind,
    gravity: f32,
    rotation_speed: f32,
}

impl ParticlePreset {
    fn config(self) -> PresetConfig {
        match self {
            ParticlePreset::Zip => PresetConfig {
                velocity_spread: 3.0,
                velocity_bias: Vec2::ZERO,
                base_size: 4.0,
                size_variance: 2.0,
                lifetime_ms: 400.0,
                kind: ParticleKind::Web,
                gravity: 0.0,
                rotation_speed: 0.0,
            },
            ParticlePreset::WebShoot => PresetConfig {
                velocity_spread: 2.0,
                velocity_bias: Vec2::ZERO,
                base_size: 2.0,
                size_variance: 2.0,
                lifetime_ms: 300.0,
                kind: ParticleKind::Web,
                gravity: 0.0,
                rotation_speed: 0.0,
            },
            ParticlePreset::Catch => PresetConfig {
                velocity_spread: 8.0,
                velocity_bias: Vec2::ZERO,
                base_size: 4.0,
                size_variance: 4.0,
                lifetime_ms: 600.0,
                kind: ParticleKind::Catch,
                gravity: 0.1,
                rotation_speed: 0.0,
            },
            ParticlePreset::Combo => PresetConfig {
                velocity_spread: 10.0,
                velocity_bias: Vec2::new(0.0, -7.5),
                base_size: 4.0,
                size_variance: 2.0,
                lifetime_ms: 800.0,
                kind: ParticleKind::Combo,
                gravity: 0.0,
                rotation_speed: 0.0,
            },
            ParticlePreset::PowerUp => PresetConfig {
                velocity_spread: 12.0,
                velocity_bias: Vec2::ZERO,
                base_size: 6.0,
                size_variance: 4.0,
                lifetime_ms: 800.0,
                kind: ParticleKind::Sparkle,
                gravity: 0.0,
                rotation_speed: 0.0,
            },
            ParticlePreset::Trail => PresetConfig {
                velocity_spread: 2.0,
                velocity_bias: Vec2::ZERO,
                base_size: 2.0,
                size_variance: 2.0,
                lifetime_ms: 500.0,
                kind: ParticleKind::Trail,
                gravity: 0.0,
                rotation_speed: 0.0,
            },
            ParticlePreset::Confetti => PresetConfig {
                velocity_spread: 15.0,
                velocity_bias: Vec2::new(0.0, -8.0),
                base_size: 8.0,
                size_variance: 4.0,
                lifetime_ms: 1200.0,
                kind: ParticleKind::Confetti,
                gravity: 0.15,
                rotation_speed: 10.0,
            },
            ParticlePreset::Landing => PresetConfig {
                velocity_spread: 6.0,
                velocity_bias: Vec2::new(0.0, -2.0),
                base_size: 4.0,
                size_variance: 3.0,
                lifetime_ms: 400.0,
                kind: ParticleKind::Landing,
                gravity: 0.0,
                rotation_speed: 0.0,
            },
        }
    }
}

/// Radial burst of `count` particles from a preset
pub fn burst(
    preset: ParticlePreset,
    pos: Vec2,
    count: usize,
    rng: &mut Pcg32,
    now_ms: f64,
) -> Vec<Particle> {
    let config = preset.config();
    (0..count)
        .map(|_| {
            let heading = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random::<f32>() * config.velocity_spread;
            Particle {
                pos,
                vel: unit_from_angle(heading) * speed + config.velocity_bias,
                size: config.base_size + rng.random::<f32>() * config.size_variance,
                lifetime_ms: config.lifetime_ms,
                created_at_ms: now_ms,
                kind: config.kind,
                rotation: rng.random_range(0.0..std::f32::consts::TAU),
                rotation_speed: config.rotation_speed * (rng.random::<f32>() - 0.5),
                gravity: config.gravity,
            }
        })
        .collect()
}

/// Web-shot streak: particles scattered along the aim direction
pub fn web_shoot_burst(
    start: Vec2,
    target: Vec2,
    count: usize,
    rng: &mut Pcg32,
    now_ms: f64,
) -> Vec<Particle> {
    let config = ParticlePreset::WebShoot.config();
    let dir = (target - start).normalize_or_zero();
    (0..count)
        .map(|_| {
            let along = rng.random::<f32>();
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * config.velocity_spread,
                (rng.random::<f32>() - 0.5) * config.velocity_spread,
            );
            Particle {
                pos: start + (target - start) * along,
                vel: dir * config.velocity_spread + jitter,
                size: config.base_size + rng.random::<f32>() * config.size_variance,
                lifetime_ms: config.lifetime_ms,
                created_at_ms: now_ms,
                kind: config.kind,
                rotation: 0.0,
                rotation_speed: 0.0,
                gravity: config.gravity,
            }
        })
        .collect()
}

/// Expanding ring, evenly spaced around the catch point
pub fn ring_burst(pos: Vec2, now_ms: f64) -> Vec<Particle> {
    (0..RING_COUNT)
        .map(|i| {
            let heading = i as f32 / RING_COUNT as f32 * std::f32::consts::TAU;
            Particle {
                pos,
                vel: unit_from_angle(heading) * 5.0,
                size: 3.0,
                lifetime_ms: 500.0,
                created_at_ms: now_ms,
                kind: ParticleKind::Ring,
                rotation: heading,
                rotation_speed: 0.0,
                gravity: 0.0,
            }
        })
        .collect()
}

/// Dust kicked up on a hard landing; count scales with fall speed
pub fn landing_burst(pos: Vec2, fall_speed: f32, rng: &mut Pcg32, now_ms: f64) -> Vec<Particle> {
    let count = (fall_speed.floor() as usize).min(12);
    burst(ParticlePreset::Landing, pos, count, rng, now_ms)
}

/// Single movement-trail particle at the spider's position
pub fn trail_particle(pos: Vec2, zipping: bool, rng: &mut Pcg32, now_ms: f64) -> Particle {
    let preset = if zipping {
        ParticlePreset::Zip
    } else {
        ParticlePreset::Trail
    };
    let mut batch = burst(preset, pos, 1, rng, now_ms);
    batch.pop().unwrap_or(Particle {
        pos,
        vel: Vec2::ZERO,
        size: 2.0,
        lifetime_ms: 500.0,
        created_at_ms: now_ms,
        kind: ParticleKind::Trail,
        rotation: 0.0,
        rotation_speed: 0.0,
        gravity: 0.0,
    })
}

/// Append a batch, evicting the oldest entries past [`MAX_PARTICLES`]
pub fn push_capped(particles: &mut Vec<Particle>, batch: Vec<Particle>) {
    particles.extend(batch);
    let overflow = particles.len().saturating_sub(MAX_PARTICLES);
    if overflow > 0 {
        particles.drain(..overflow);
    }
}

/// Integrate and prune all live particles for one tick
pub fn update_particles(particles: &mut Vec<Particle>, now_ms: f64) {
    particles.retain(|p| !p.expired(now_ms));
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel *= 0.98;
        p.vel.y += p.gravity;
        p.rotation += p.rotation_speed;
    }
}
