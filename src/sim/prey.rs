//! Prey kinds, behavior table and per-tick advance
//!
//! Each kind carries an immutable config record (speed, size, value, spawn
//! weight) and a behavior tag; a single `advance` drives all of them. Flee
//! overrides the behavior whenever the spider gets close, and web entrapment
//! is re-derived from the live web set every tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::caught_in_webs;
use crate::sim::state::Web;
use crate::unit_from_angle;

/// Movement style while wandering free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Straight lines, bounces off walls
    Wander,
    /// Randomly re-aims with a small per-tick probability
    Erratic,
    /// Holds a minimum speed floor
    Fast,
    /// Sinusoidal vertical bob
    Hovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreyKind {
    Moth,
    Firefly,
    Beetle,
    Dragonfly,
    Butterfly,
    GoldenMoth,
}

/// Immutable per-kind tuning
#[derive(Debug, Clone, Copy)]
pub struct PreyConfig {
    pub base_speed: f32,
    pub size: f32,
    /// Score awarded at combo 1
    pub value: u64,
    pub behavior: Behavior,
    /// Relative spawn frequency; higher = more common
    pub spawn_weight: u32,
}

impl PreyKind {
    pub const ALL: [PreyKind; 6] = [
        PreyKind::Moth,
        PreyKind::Firefly,
        PreyKind::Beetle,
        PreyKind::Dragonfly,
        PreyKind::Butterfly,
        PreyKind::GoldenMoth,
    ];

    pub fn config(self) -> &'static PreyConfig {
        match self {
            PreyKind::Moth => &PreyConfig {
                base_speed: 2.0,
                size: 16.0,
                value: 100,
                behavior: Behavior::Wander,
                spawn_weight: 30,
            },
            PreyKind::Firefly => &PreyConfig {
                base_speed: 1.5,
                size: 12.0,
                value: 150,
                behavior: Behavior::Hovering,
                spawn_weight: 25,
            },
            PreyKind::Beetle => &PreyConfig {
                base_speed: 1.2,
                size: 20.0,
                value: 200,
                behavior: Behavior::Wander,
                spawn_weight: 15,
            },
            PreyKind::Dragonfly => &PreyConfig {
                base_speed: 3.5,
                size: 18.0,
                value: 300,
                behavior: Behavior::Fast,
                spawn_weight: 12,
            },
            PreyKind::Butterfly => &PreyConfig {
                base_speed: 1.8,
                size: 16.0,
                value: 250,
                behavior: Behavior::Erratic,
                spawn_weight: 12,
            },
            PreyKind::GoldenMoth => &PreyConfig {
                base_speed: 2.5,
                size: 16.0,
                value: 500,
                behavior: Behavior::Erratic,
                spawn_weight: 5,
            },
        }
    }

    /// Weighted random kind
    pub fn roll(rng: &mut Pcg32) -> PreyKind {
        let total: u32 = Self::ALL.iter().map(|k| k.config().spawn_weight).sum();
        let mut pick = rng.random_range(0..total);
        for kind in Self::ALL {
            let weight = kind.config().spawn_weight;
            if pick < weight {
                return kind;
            }
            pick -= weight;
        }
        PreyKind::Moth
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prey {
    pub id: u32,
    pub kind: PreyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Derived each tick from the live web set
    pub is_trapped: bool,
    /// Sprite rotation (cosmetic)
    pub angle: f32,
    /// Wing-flap phase (cosmetic, also seeds the hover bob)
    pub wing_phase: f32,
}

impl Prey {
    /// Spawn at a random screen edge with a random heading. Base speed is
    /// scaled up by the current difficulty.
    pub fn spawn(id: u32, rng: &mut Pcg32, width: f32, height: f32, difficulty: f32) -> Self {
        let kind = PreyKind::roll(rng);
        let config = kind.config();

        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(rng.random_range(0.0..width), -PREY_SPAWN_EDGE_OFFSET),
            1 => Vec2::new(width + PREY_SPAWN_EDGE_OFFSET, rng.random_range(0.0..height)),
            2 => Vec2::new(rng.random_range(0.0..width), height + PREY_SPAWN_EDGE_OFFSET),
            _ => Vec2::new(-PREY_SPAWN_EDGE_OFFSET, rng.random_range(0.0..height)),
        };

        let speed = config.base_speed * (1.0 + (difficulty - 1.0) * PREY_SPEED_BONUS);
        let heading = rng.random_range(0.0..std::f32::consts::TAU);

        Self {
            id,
            kind,
            pos,
            vel: unit_from_angle(heading) * speed,
            is_trapped: false,
            angle: 0.0,
            wing_phase: rng.random_range(0.0..std::f32::consts::TAU),
        }
    }

    /// One behavior tick: trap transitions, flee override, kind behavior,
    /// wall bounce. `time_scale` is 1 normally, halved under SlowTime.
    pub fn advance(
        &mut self,
        rng: &mut Pcg32,
        spider_pos: Vec2,
        webs: &[Web],
        width: f32,
        height: f32,
        now_ms: f64,
        time_scale: f32,
    ) {
        let config = self.kind.config();
        let ground_y = height - GROUND_HEIGHT;

        if self.is_trapped {
            if !caught_in_webs(self.pos, webs) {
                // Burst free with a fresh random velocity
                self.is_trapped = false;
                self.vel = Vec2::new(
                    (rng.random::<f32>() - 0.5) * config.base_speed * 2.0,
                    (rng.random::<f32>() - 0.5) * config.base_speed * 2.0,
                );
            } else {
                // Struggle: damped velocity plus jitter, sluggish integration
                self.vel = self.vel * PREY_STRUGGLE_DAMPING
                    + Vec2::new(
                        (rng.random::<f32>() - 0.5) * 0.2,
                        (rng.random::<f32>() - 0.5) * 0.2,
                    );
                self.pos += self.vel * 0.3 * time_scale;
                // Trapped is a function of where the prey ended up, so a
                // struggle that wriggles off the segment frees it
                self.is_trapped = caught_in_webs(self.pos, webs);
            }
        } else {
            let to_spider = spider_pos - self.pos;
            if to_spider.length_squared() < PREY_FLEE_RADIUS * PREY_FLEE_RADIUS {
                // Flee overrides the kind behavior
                let away = (-to_spider).normalize_or_zero();
                self.vel = away * config.base_speed * PREY_FLEE_BOOST;
            } else {
                match config.behavior {
                    Behavior::Wander => {}
                    Behavior::Erratic => {
                        if rng.random::<f32>() < 0.1 {
                            let heading = rng.random_range(0.0..std::f32::consts::TAU);
                            self.vel = unit_from_angle(heading) * config.base_speed;
                        }
                    }
                    Behavior::Hovering => {
                        self.vel.y +=
                            ((now_ms * 0.005) as f32 + self.wing_phase).sin() * 0.3;
                    }
                    Behavior::Fast => {
                        // Re-normalize toward the speed floor if drag/bounces
                        // slowed us down
                        let speed = self.vel.length();
                        if speed < config.base_speed && speed > 0.0 {
                            self.vel = self.vel / speed * config.base_speed;
                        }
                    }
                }
            }

            self.pos += self.vel * time_scale;

            // Wall bounce with clamp
            if self.pos.x < 0.0 || self.pos.x > width {
                self.vel.x = -self.vel.x;
                self.pos.x = self.pos.x.clamp(0.0, width);
            }
            if self.pos.y < 0.0 || self.pos.y > ground_y {
                self.vel.y = -self.vel.y;
                self.pos.y = self.pos.y.clamp(0.0, ground_y);
            }

            if caught_in_webs(self.pos, webs) {
                // Free -> trapped: struggling feels sluggish
                self.is_trapped = true;
                self.vel *= PREY_TRAP_SLOWDOWN;
            }
        }

        self.angle += 0.1;
        self.wing_phase += 0.2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const W: f32 = 1000.0;
    const H: f32 = 600.0;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn web_across(y: f32) -> Web {
        Web {
            id: 1,
            start: Vec2::new(0.0, y),
            end: Vec2::new(W, y),
            created_at_ms: 0.0,
            lifetime_ms: 5000.0,
        }
    }

    fn moth_at(pos: Vec2) -> Prey {
        Prey {
            id: 1,
            kind: PreyKind::Moth,
            pos,
            vel: Vec2::new(2.0, 0.0),
            is_trapped: false,
            angle: 0.0,
            wing_phase: 0.0,
        }
    }

    #[test]
    fn test_roll_respects_weights() {
        let mut rng = rng();
        let mut golden = 0;
        for _ in 0..1000 {
            if PreyKind::roll(&mut rng) == PreyKind::GoldenMoth {
                golden += 1;
            }
        }
        // ~5% expected; anything between 1% and 15% is fine for 1000 rolls
        assert!((10..150).contains(&golden), "golden rolls: {golden}");
    }

    #[test]
    fn test_spawn_is_off_screen() {
        let mut rng = rng();
        for i in 0..50 {
            let prey = Prey::spawn(i, &mut rng, W, H, 1.0);
            let on_screen = (0.0..=W).contains(&prey.pos.x) && (0.0..=H).contains(&prey.pos.y);
            assert!(!on_screen, "spawned inside the arena at {:?}", prey.pos);
        }
    }

    #[test]
    fn test_difficulty_scales_spawn_speed() {
        let mut rng_a = rng();
        let mut rng_b = rng();
        let slow = Prey::spawn(1, &mut rng_a, W, H, 1.0);
        let fast = Prey::spawn(1, &mut rng_b, W, H, 3.0);
        // Same rng stream, same kind and heading; only the speed differs
        assert_eq!(slow.kind, fast.kind);
        assert!(fast.vel.length() > slow.vel.length());
    }

    #[test]
    fn test_entering_web_traps_and_slows() {
        let mut rng = rng();
        let mut prey = moth_at(Vec2::new(500.0, 100.0));
        prey.vel = Vec2::new(0.0, 3.0);
        let webs = [web_across(102.0)];

        prey.advance(&mut rng, Vec2::new(0.0, 500.0), &webs, W, H, 0.0, 1.0);
        assert!(prey.is_trapped);
        assert!(prey.vel.length() < 3.0 * PREY_TRAP_SLOWDOWN + 0.001);
    }

    #[test]
    fn test_web_removal_frees_prey() {
        let mut rng = rng();
        let mut prey = moth_at(Vec2::new(500.0, 100.0));
        prey.is_trapped = true;
        prey.vel = Vec2::ZERO;

        prey.advance(&mut rng, Vec2::new(0.0, 500.0), &[], W, H, 0.0, 1.0);
        assert!(!prey.is_trapped);
        // Burst-free velocity is re-randomized
        assert!(prey.vel.length() > 0.0);
    }

    #[test]
    fn test_flee_points_away_from_spider() {
        let mut rng = rng();
        let mut prey = moth_at(Vec2::new(500.0, 300.0));
        let spider = Vec2::new(450.0, 300.0);

        prey.advance(&mut rng, spider, &[], W, H, 0.0, 1.0);
        assert!(prey.vel.x > 0.0, "should flee right, vel {:?}", prey.vel);
        let speed = prey.vel.length();
        let expected = PreyKind::Moth.config().base_speed * PREY_FLEE_BOOST;
        assert!((speed - expected).abs() < 0.001);
    }

    #[test]
    fn test_wall_bounce_reflects_velocity() {
        let mut rng = rng();
        let mut prey = moth_at(Vec2::new(W - 1.0, 300.0));
        prey.vel = Vec2::new(5.0, 0.0);
        // Spider far away so no flee
        prey.advance(&mut rng, Vec2::new(0.0, 0.0), &[], W, H, 0.0, 1.0);
        assert!(prey.vel.x < 0.0);
        assert!(prey.pos.x <= W);
    }

    #[test]
    fn test_fast_behavior_keeps_speed_floor() {
        let mut rng = rng();
        let mut prey = moth_at(Vec2::new(500.0, 300.0));
        prey.kind = PreyKind::Dragonfly;
        prey.vel = Vec2::new(0.5, 0.0); // well under the floor

        prey.advance(&mut rng, Vec2::new(0.0, 0.0), &[], W, H, 0.0, 1.0);
        let floor = PreyKind::Dragonfly.config().base_speed;
        assert!(prey.vel.length() >= floor - 0.001);
    }
}
