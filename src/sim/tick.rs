//! Fixed timestep simulation tick
//!
//! The single per-frame entry point. Step order is load-bearing and must not
//! change casually:
//!
//! 1. phase gate (+ freeze-frame sub-guard that advances time only)
//! 2. spider physics
//! 3. catch/pickup collisions and magnet steering
//! 4. web energy regen
//! 5. web expiry
//! 6. prey behavior + web entrapment + wall bounce
//! 7. particle/popup/power-up aging
//! 8. combo time decay (after catches, so a catch this tick wins)
//!
//! Every step reads either the previously committed state or locals produced
//! by earlier steps, never a partially-updated later step.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::collision::{magnet_nudge, within_radius};
use crate::sim::particles::{self, TRAIL_CHANCE};
use crate::sim::physics;
use crate::sim::state::{GamePhase, GameState, PowerUpKind};

impl GameState {
    /// Advance the simulation by one frame
    pub fn tick(&mut self) {
        // 1. Phase gate: only a playing sim moves
        if self.phase != GamePhase::Playing {
            return;
        }

        // Freeze-frame hit-stop: the clock runs, physics does not
        if self.freeze_frame_ms > 0.0 {
            self.time_ticks += 1;
            self.freeze_frame_ms = (self.freeze_frame_ms - TICK_MS).max(0.0);
            return;
        }

        self.time_ticks += 1;
        let now = self.now_ms();

        // Decay transient feedback
        self.screen_shake *= SCREEN_SHAKE_DECAY;
        if self.screen_shake < 0.01 {
            self.screen_shake = 0.0;
            self.screen_shake_dir = Vec2::ZERO;
        }
        if let Some(flash) = &mut self.screen_flash {
            flash.remaining_ms -= TICK_MS;
            if flash.remaining_ms <= 0.0 {
                self.screen_flash = None;
            }
        }
        // One-tick pulse for the renderer
        self.is_web_shooting = false;

        // 2. Spider physics
        let boosted = self.has_power_up(PowerUpKind::Speed);
        let step = physics::step_spider(
            self.position,
            self.velocity,
            self.is_jumping,
            self.is_zipping,
            boosted,
            self.width,
            self.height,
        );
        self.position = step.position;
        self.velocity = step.velocity;
        self.is_jumping = step.is_jumping;
        self.is_zipping = step.is_zipping;
        self.is_on_wall = step.is_on_wall;
        if let Some(fall_speed) = step.landed_at_speed {
            let touch = Vec2::new(self.position.x, self.ground_y());
            let batch = particles::landing_burst(touch, fall_speed, &mut self.rng, now);
            particles::push_capped(&mut self.particles, batch);
        }

        // 3. Catches, magnet steering, pickups. Ids are snapshotted first so
        // each catch removes its prey before the next is resolved.
        let caught: Vec<u32> = self
            .prey
            .iter()
            .filter(|p| within_radius(p.pos, self.position, CATCH_RADIUS))
            .map(|p| p.id)
            .collect();
        for id in caught {
            self.catch_prey(id);
        }

        if self.has_power_up(PowerUpKind::Magnet) {
            let spider = self.position;
            for prey in &mut self.prey {
                if let Some(nudge) = magnet_nudge(spider, prey.pos) {
                    prey.vel += nudge;
                }
            }
        }

        let collected: Vec<u32> = self
            .power_ups
            .iter()
            .filter(|p| within_radius(p.pos, self.position, POWER_UP_COLLECT_RADIUS))
            .map(|p| p.id)
            .collect();
        for id in collected {
            self.collect_power_up(id);
        }

        // 4. Web energy regen
        self.web_energy = (self.web_energy + WEB_ENERGY_REGEN).min(WEB_ENERGY_MAX);

        // 5. Prune expired webs
        self.webs.retain(|w| !w.expired(now));

        // 6. Prey behavior against the surviving web set
        let time_scale = if self.has_power_up(PowerUpKind::SlowTime) {
            SLOW_TIME_FACTOR
        } else {
            1.0
        };
        let spider = self.position;
        let (width, height) = (self.width, self.height);
        let GameState {
            prey, webs, rng, ..
        } = self;
        for p in prey.iter_mut() {
            p.advance(rng, spider, webs, width, height, now, time_scale);
        }

        // 7. Age/prune the ephemeral collections
        particles::update_particles(&mut self.particles, now);
        self.score_popups
            .retain(|p| now - p.created_at_ms < SCORE_POPUP_MS);
        self.power_ups
            .retain(|p| now - p.created_at_ms < p.lifetime_ms);
        self.active_power_ups.retain(|p| p.expires_at_ms > now);

        // Movement trail
        if self.is_crawling || self.is_jumping || self.is_zipping {
            let chance = if self.is_zipping { 1.0 } else { TRAIL_CHANCE };
            if self.rng.random::<f32>() < chance {
                let p =
                    particles::trail_particle(self.position, self.is_zipping, &mut self.rng, now);
                particles::push_capped(&mut self.particles, vec![p]);
            }
        }

        // 8. Combo time decay (a catch earlier this tick already refreshed
        // last_catch_time_ms, so it is immune)
        if self.combo > 0 && now - self.last_catch_time_ms > COMBO_WINDOW_MS {
            self.combo = 0;
        }
    }
}
