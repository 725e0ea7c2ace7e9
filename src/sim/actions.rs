//! Input-layer commands
//!
//! Everything the input/UI layers may call between ticks. All refusals are
//! silent no-ops (insufficient energy, degenerate geometry, stale entity
//! ids); arcade inputs are fire-and-forget.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::particles::{
    self, CATCH_COUNT, CONFETTI_COUNT, POWER_UP_COUNT, WEB_SHOOT_COUNT, ZIP_COUNT, ParticlePreset,
};
use crate::sim::prey::Prey;
use crate::sim::state::{
    ActivePowerUp, Direction, GameState, PowerUp, PowerUpKind, ScorePopup, ScreenFlash, Web,
};
use crate::unit_from_angle;

impl GameState {
    // --- Movement ---

    /// Overwrite velocity components; `None` leaves an axis untouched
    pub fn set_velocity(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.velocity.x = x;
        }
        if let Some(y) = y {
            self.velocity.y = y;
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_crawling(&mut self, crawling: bool) {
        self.is_crawling = crawling;
    }

    pub fn jump(&mut self) {
        if self.is_jumping {
            return;
        }
        self.velocity.y = -JUMP_FORCE;
        self.is_jumping = true;
        self.can_double_jump = true;
    }

    /// Air jump; costs half a web shot and is spent until the next landing
    pub fn double_jump(&mut self) {
        if !self.is_jumping || !self.can_double_jump {
            return;
        }
        if self.web_energy < WEB_SHOOT_COST {
            log::debug!("double jump refused: energy {:.1}", self.web_energy);
            return;
        }
        self.velocity.y = -DOUBLE_JUMP_FORCE;
        self.can_double_jump = false;
        self.web_energy -= WEB_SHOOT_COST * 0.5;

        let now = self.now_ms();
        let batch = particles::burst(ParticlePreset::Zip, self.position, 8, &mut self.rng, now);
        particles::push_capped(&mut self.particles, batch);
    }

    /// Dash toward a target point at zip speed; drag decays it over the
    /// following ticks. Refused when too close or out of energy.
    pub fn zip_to(&mut self, target: Vec2) {
        if self.web_energy < WEB_ZIP_COST {
            log::debug!("zip refused: energy {:.1}", self.web_energy);
            return;
        }
        let offset = target - self.position;
        let distance = offset.length();
        if distance < MIN_ZIP_DISTANCE {
            return;
        }

        self.velocity = offset / distance * ZIP_SPEED;
        self.is_zipping = true;
        self.is_jumping = true;
        self.web_energy -= WEB_ZIP_COST;

        let now = self.now_ms();
        let batch =
            particles::burst(ParticlePreset::Zip, self.position, ZIP_COUNT, &mut self.rng, now);
        particles::push_capped(&mut self.particles, batch);
    }

    // --- Webs ---

    /// Fire a web segment from the spider to the target. With MultiShot
    /// active the volley is three webs in a 15-degree spread. Oldest webs
    /// are evicted past the active cap.
    pub fn shoot_web(&mut self, target: Vec2) {
        if self.web_energy < WEB_SHOOT_COST {
            log::debug!("web shot refused: energy {:.1}", self.web_energy);
            return;
        }
        let offset = target - self.position;
        let distance = offset.length();
        if distance < WEB_MIN_SEGMENT {
            // Zero-length segment would never trap anything
            return;
        }

        let now = self.now_ms();
        let multi_shot = self.has_power_up(PowerUpKind::MultiShot);

        if multi_shot {
            let base_angle = offset.y.atan2(offset.x);
            for i in -1i32..=1 {
                let angle = base_angle + i as f32 * MULTI_SHOT_SPREAD;
                let end = self.position + unit_from_angle(angle) * distance;
                self.push_web(end, now);
            }
        } else {
            self.push_web(target, now);
        }

        self.is_web_shooting = true;
        self.web_energy -= WEB_SHOOT_COST;

        let count = WEB_SHOOT_COUNT * if multi_shot { 2 } else { 1 };
        let batch =
            particles::web_shoot_burst(self.position, target, count, &mut self.rng, now);
        particles::push_capped(&mut self.particles, batch);
    }

    fn push_web(&mut self, end: Vec2, now_ms: f64) {
        let id = self.next_entity_id();
        self.webs.push(Web {
            id,
            start: self.position,
            end,
            created_at_ms: now_ms,
            lifetime_ms: WEB_LIFETIME_MS,
        });
        let overflow = self.webs.len().saturating_sub(WEB_MAX_ACTIVE);
        if overflow > 0 {
            self.webs.drain(..overflow);
        }
    }

    // --- Prey ---

    /// Spawn one prey at a screen edge; skipped at the on-screen cap
    pub fn spawn_prey(&mut self) {
        if self.prey.len() >= PREY_MAX_ON_SCREEN {
            return;
        }
        let id = self.next_entity_id();
        let prey = Prey::spawn(id, &mut self.rng, self.width, self.height, self.difficulty);
        self.prey.push(prey);
    }

    /// Resolve a catch: award combo-multiplied score, bump difficulty,
    /// emit feedback, maybe drop a power-up. Unknown ids are a no-op (the
    /// prey may already be gone this frame).
    pub fn catch_prey(&mut self, prey_id: u32) {
        let Some(idx) = self.prey.iter().position(|p| p.id == prey_id) else {
            return;
        };
        let prey = self.prey.remove(idx);
        let config = prey.kind.config();
        let now = self.now_ms();

        // Combo: chained catches inside the window climb to the cap,
        // a late catch starts over at 1
        let combo = if now - self.last_catch_time_ms < COMBO_WINDOW_MS {
            (self.combo + 1).min(COMBO_CAP)
        } else {
            1
        };
        self.combo = combo;
        self.last_catch_time_ms = now;

        let multiplier = 1.0 + (combo - 1) as f32 * COMBO_BONUS_RATE;
        let points = (config.value as f32 * multiplier).floor() as u64;
        self.score += points;
        self.difficulty =
            (1.0 + self.score as f32 * DIFFICULTY_SCALE_RATE).min(DIFFICULTY_MAX);

        let popup_id = self.next_entity_id();
        self.score_popups.push(ScorePopup {
            id: popup_id,
            pos: prey.pos,
            value: points,
            combo: (combo > 1).then_some(combo),
            created_at_ms: now,
        });

        // Feedback: catch burst + ring always, combo spray past 1,
        // confetti/flash/freeze on milestones
        let mut batch =
            particles::burst(ParticlePreset::Catch, prey.pos, CATCH_COUNT, &mut self.rng, now);
        batch.extend(particles::ring_burst(prey.pos, now));
        if combo > 1 {
            batch.extend(particles::burst(
                ParticlePreset::Combo,
                prey.pos,
                combo as usize * 3,
                &mut self.rng,
                now,
            ));
        }
        if combo == 5 || combo % 10 == 0 {
            let intensity = if combo >= 10 { 1.5 } else { 1.0 };
            batch.extend(particles::burst(
                ParticlePreset::Confetti,
                prey.pos,
                (CONFETTI_COUNT as f32 * intensity) as usize,
                &mut self.rng,
                now,
            ));
            self.trigger_screen_flash(50.0 + combo as f32 * 5.0, 0.3);
            self.trigger_freeze_frame(FREEZE_FRAME_MS);
        }
        particles::push_capped(&mut self.particles, batch);

        let shake = if combo > 5 {
            10.0
        } else if combo > 3 {
            8.0
        } else {
            4.0
        };
        self.trigger_screen_shake(shake, prey.pos - self.position);

        // Combo streaks make power-ups more likely
        let chance = POWER_UP_SPAWN_CHANCE * (1.0 + combo as f32 * 0.1);
        if self.rng.random::<f32>() < chance {
            self.spawn_power_up(prey.pos);
        }

        log::debug!("catch: +{points} (combo x{combo}, score {})", self.score);
    }

    // --- Power-ups ---

    pub fn spawn_power_up(&mut self, pos: Vec2) {
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        let id = self.next_entity_id();
        let now = self.now_ms();
        self.power_ups.push(PowerUp {
            id,
            kind,
            pos,
            created_at_ms: now,
            lifetime_ms: POWER_UP_LIFETIME_MS,
        });
    }

    /// Pick up a power-up: WebEnergy refills instantly, everything else
    /// becomes a timed buff (re-picking a kind refreshes its expiry).
    pub fn collect_power_up(&mut self, power_up_id: u32) {
        let Some(idx) = self.power_ups.iter().position(|p| p.id == power_up_id) else {
            return;
        };
        let power_up = self.power_ups.remove(idx);
        let now = self.now_ms();

        match power_up.kind {
            PowerUpKind::WebEnergy => {
                self.web_energy = (self.web_energy + WEB_ENERGY_REFILL).min(WEB_ENERGY_MAX);
            }
            kind => {
                self.active_power_ups.retain(|p| p.kind != kind);
                self.active_power_ups.push(ActivePowerUp {
                    kind,
                    expires_at_ms: now + POWER_UP_DURATION_MS,
                });
            }
        }

        let batch = particles::burst(
            ParticlePreset::PowerUp,
            power_up.pos,
            POWER_UP_COUNT,
            &mut self.rng,
            now,
        );
        particles::push_capped(&mut self.particles, batch);

        log::debug!("collected power-up {:?}", power_up.kind);
    }

    // --- Feedback ---

    pub fn trigger_screen_shake(&mut self, intensity: f32, direction: Vec2) {
        self.screen_shake = intensity;
        self.screen_shake_dir = direction.normalize_or_zero();
    }

    pub fn trigger_screen_flash(&mut self, hue: f32, intensity: f32) {
        self.screen_flash = Some(ScreenFlash {
            hue,
            intensity,
            remaining_ms: SCREEN_FLASH_MS,
        });
    }

    pub fn trigger_freeze_frame(&mut self, duration_ms: f64) {
        self.freeze_frame_ms = duration_ms;
    }

    // --- Environment ---

    pub fn set_mouse_position(&mut self, pos: Vec2) {
        self.mouse_pos = pos;
    }

    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn playing_state() -> GameState {
        let mut state = GameState::new(11);
        state.start_game();
        state
    }

    #[test]
    fn test_jump_once_until_grounded() {
        let mut state = playing_state();
        state.jump();
        assert!(state.is_jumping);
        assert_eq!(state.velocity.y, -JUMP_FORCE);

        state.velocity.y = 3.0;
        state.jump(); // already airborne: refused
        assert_eq!(state.velocity.y, 3.0);
    }

    #[test]
    fn test_double_jump_spends_once() {
        let mut state = playing_state();
        state.jump();
        state.double_jump();
        assert!(!state.can_double_jump);
        assert_eq!(state.velocity.y, -DOUBLE_JUMP_FORCE);
        let energy = state.web_energy;

        state.double_jump(); // spent: refused
        assert_eq!(state.web_energy, energy);
    }

    #[test]
    fn test_shoot_web_insufficient_energy_is_noop() {
        let mut state = playing_state();
        state.web_energy = WEB_SHOOT_COST - 10.0;
        state.shoot_web(state.position + Vec2::new(200.0, 0.0));
        assert!(state.webs.is_empty());
        assert_eq!(state.web_energy, WEB_SHOOT_COST - 10.0);
    }

    #[test]
    fn test_shoot_web_degenerate_target_is_noop() {
        let mut state = playing_state();
        state.shoot_web(state.position + Vec2::new(2.0, 0.0));
        assert!(state.webs.is_empty());
        assert_eq!(state.web_energy, WEB_ENERGY_MAX);
    }

    #[test]
    fn test_web_cap_evicts_oldest() {
        let mut state = playing_state();
        state.web_energy = 1000.0;
        for i in 0..(WEB_MAX_ACTIVE + 2) {
            state.shoot_web(state.position + Vec2::new(200.0, i as f32 * 10.0));
        }
        assert_eq!(state.webs.len(), WEB_MAX_ACTIVE);
        // Ids are monotonic; the survivors are the newest
        let ids: Vec<u32> = state.webs.iter().map(|w| w.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_multi_shot_fires_three() {
        let mut state = playing_state();
        let now = state.now_ms();
        state.active_power_ups.push(ActivePowerUp {
            kind: PowerUpKind::MultiShot,
            expires_at_ms: now + 1000.0,
        });
        state.shoot_web(state.position + Vec2::new(200.0, 0.0));
        assert_eq!(state.webs.len(), 3);
        // One energy charge for the volley
        assert_eq!(state.web_energy, WEB_ENERGY_MAX - WEB_SHOOT_COST);
    }

    #[test]
    fn test_zip_refuses_short_distance() {
        let mut state = playing_state();
        state.zip_to(state.position + Vec2::new(MIN_ZIP_DISTANCE - 1.0, 0.0));
        assert!(!state.is_zipping);
        assert_eq!(state.web_energy, WEB_ENERGY_MAX);
    }

    #[test]
    fn test_zip_sets_velocity_toward_target() {
        let mut state = playing_state();
        state.zip_to(state.position + Vec2::new(300.0, 0.0));
        assert!(state.is_zipping);
        assert!(state.is_jumping);
        assert_eq!(state.velocity, Vec2::new(ZIP_SPEED, 0.0));
        assert_eq!(state.web_energy, WEB_ENERGY_MAX - WEB_ZIP_COST);
    }

    #[test]
    fn test_spawn_prey_respects_cap() {
        let mut state = playing_state();
        for _ in 0..20 {
            state.spawn_prey();
        }
        assert_eq!(state.prey.len(), PREY_MAX_ON_SCREEN);
    }

    #[test]
    fn test_catch_awards_base_value_at_combo_one() {
        let mut state = playing_state();
        state.spawn_prey();
        let (id, value) = {
            let p = &state.prey[0];
            (p.id, p.kind.config().value)
        };
        state.catch_prey(id);
        assert_eq!(state.score, value);
        assert_eq!(state.combo, 1);
        assert!(state.prey.is_empty());
        assert_eq!(state.score_popups.len(), 1);
    }

    #[test]
    fn test_catch_unknown_id_is_noop() {
        let mut state = playing_state();
        state.catch_prey(9999);
        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_combo_multiplier_applied() {
        let mut state = playing_state();
        state.spawn_prey();
        state.spawn_prey();
        let ids: Vec<u32> = state.prey.iter().map(|p| p.id).collect();
        let values: Vec<u64> = state.prey.iter().map(|p| p.kind.config().value).collect();

        state.catch_prey(ids[0]);
        // Second catch in the same tick is well inside the window
        state.catch_prey(ids[1]);

        assert_eq!(state.combo, 2);
        let expected = values[0] + (values[1] as f32 * 1.25).floor() as u64;
        assert_eq!(state.score, expected);
    }

    #[test]
    fn test_combo_milestone_fires_feedback() {
        use crate::sim::particles::ParticleKind;

        let mut state = playing_state();
        for _ in 0..4 {
            state.spawn_prey();
            let id = state.prey[0].id;
            state.catch_prey(id);
        }
        assert_eq!(state.combo, 4);
        // No milestone yet
        assert!(state.screen_flash.is_none());
        assert_eq!(state.freeze_frame_ms, 0.0);

        state.spawn_prey();
        let id = state.prey[0].id;
        state.catch_prey(id);

        assert_eq!(state.combo, 5);
        assert!(state.screen_flash.is_some());
        assert_eq!(state.freeze_frame_ms, FREEZE_FRAME_MS);
        assert!(
            state
                .particles
                .iter()
                .any(|p| p.kind == ParticleKind::Confetti)
        );
    }

    #[test]
    fn test_difficulty_tracks_score() {
        let mut state = playing_state();
        state.score = 5000;
        state.spawn_prey();
        let id = state.prey[0].id;
        state.catch_prey(id);
        let expected = (1.0 + state.score as f32 * DIFFICULTY_SCALE_RATE).min(DIFFICULTY_MAX);
        assert!((state.difficulty - expected).abs() < 0.0001);
    }

    #[test]
    fn test_collect_web_energy_refills_instantly() {
        let mut state = playing_state();
        state.web_energy = 10.0;
        state.power_ups.push(PowerUp {
            id: 77,
            kind: PowerUpKind::WebEnergy,
            pos: state.position,
            created_at_ms: 0.0,
            lifetime_ms: POWER_UP_LIFETIME_MS,
        });
        state.collect_power_up(77);
        assert_eq!(state.web_energy, 10.0 + WEB_ENERGY_REFILL);
        assert!(state.power_ups.is_empty());
        assert!(state.active_power_ups.is_empty());
    }

    #[test]
    fn test_collect_timed_buff_replaces_same_kind() {
        let mut state = playing_state();
        for id in [1u32, 2] {
            state.power_ups.push(PowerUp {
                id,
                kind: PowerUpKind::Magnet,
                pos: state.position,
                created_at_ms: 0.0,
                lifetime_ms: POWER_UP_LIFETIME_MS,
            });
        }
        state.collect_power_up(1);
        state.time_ticks += 60;
        state.collect_power_up(2);

        let magnets: Vec<_> = state
            .active_power_ups
            .iter()
            .filter(|p| p.kind == PowerUpKind::Magnet)
            .collect();
        assert_eq!(magnets.len(), 1);
        assert!(magnets[0].expires_at_ms > POWER_UP_DURATION_MS);
    }

    #[test]
    fn test_collect_unknown_id_is_noop() {
        let mut state = playing_state();
        state.collect_power_up(4242);
        assert!(state.active_power_ups.is_empty());
    }

    #[test]
    fn test_actions_keep_energy_in_bounds() {
        let mut state = playing_state();
        assert_eq!(state.phase, GamePhase::Playing);
        for i in 0..50 {
            state.shoot_web(state.position + Vec2::new(200.0, i as f32));
            state.zip_to(state.position + Vec2::new(0.0, 200.0));
            assert!(state.web_energy >= 0.0);
            assert!(state.web_energy <= WEB_ENERGY_MAX);
        }
    }
}
