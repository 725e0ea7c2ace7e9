//! Game state and core simulation types
//!
//! Everything the simulation owns lives on [`GameState`]; external code
//! reads it as a snapshot and mutates only through the command methods.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::particles::Particle;
use crate::sim::prey::Prey;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen; simulation inert
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run
    Paused,
    /// Run ended; high score folded in
    GameOver,
}

/// Last significant movement axis, drives sprite facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

/// A web line segment with a time-to-live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Web {
    pub id: u32,
    pub start: Vec2,
    pub end: Vec2,
    pub created_at_ms: f64,
    pub lifetime_ms: f64,
}

impl Web {
    /// Whether the web has outlived its lifetime at `now`
    #[inline]
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.created_at_ms >= self.lifetime_ms
    }
}

/// Power-up pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Horizontal speed multiplier
    Speed,
    /// Instant web energy refill (no timed buff)
    WebEnergy,
    /// Prey inside the magnet radius drifts toward the spider
    Magnet,
    /// Webs fire in a three-way spread
    MultiShot,
    /// Prey moves at half rate
    SlowTime,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Speed,
        PowerUpKind::WebEnergy,
        PowerUpKind::Magnet,
        PowerUpKind::MultiShot,
        PowerUpKind::SlowTime,
    ];
}

/// A power-up waiting on the ground to be picked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub created_at_ms: f64,
    pub lifetime_ms: f64,
}

/// A collected, currently-active timed buff. At most one per kind; a fresh
/// pickup of the same kind replaces the old expiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub expires_at_ms: f64,
}

/// Floating "+250 x3" text for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePopup {
    pub id: u32,
    pub pos: Vec2,
    pub value: u64,
    /// Combo level at the catch, when above 1
    pub combo: Option<u32>,
    pub created_at_ms: f64,
}

/// Full-screen flash overlay state (hue encoded as HSL degrees)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScreenFlash {
    pub hue: f32,
    pub intensity: f32,
    pub remaining_ms: f64,
}

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic for a given seed + command sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG; rebuilt from `seed` after deserialize via [`GameState::reseed`]
    #[serde(skip, default = "skipped_rng")]
    pub(crate) rng: Pcg32,
    /// Simulation tick counter; the monotonic clock is derived from it
    pub time_ticks: u64,

    // Spider kinematics
    pub position: Vec2,
    /// Per-tick position delta
    pub velocity: Vec2,
    pub direction: Direction,

    // Movement flags
    pub is_jumping: bool,
    pub is_crawling: bool,
    pub is_web_shooting: bool,
    pub is_zipping: bool,
    pub is_on_wall: bool,
    pub can_double_jump: bool,

    // Progression
    pub score: u64,
    pub high_score: u64,
    /// Bounded resource in `[0, WEB_ENERGY_MAX]`
    pub web_energy: f32,
    pub combo: u32,
    pub last_catch_time_ms: f64,
    pub phase: GamePhase,
    /// Monotonic within a run, derived from score
    pub difficulty: f32,
    pub active_power_ups: Vec<ActivePowerUp>,

    // Transient visual feedback (read by the presentation layer only)
    pub screen_shake: f32,
    pub screen_shake_dir: Vec2,
    pub screen_flash: Option<ScreenFlash>,
    pub freeze_frame_ms: f64,

    // Entity collections
    pub webs: Vec<Web>,
    pub prey: Vec<Prey>,
    /// Cosmetic only; never read by collision logic
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub score_popups: Vec<ScorePopup>,
    pub power_ups: Vec<PowerUp>,

    // Environment
    pub mouse_pos: Vec2,
    pub width: f32,
    pub height: f32,

    pub(crate) next_id: u32,
}

impl GameState {
    /// Create a fresh state in the menu phase
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            position: Vec2::new(DEFAULT_WIDTH / 2.0, DEFAULT_HEIGHT / 2.0),
            velocity: Vec2::ZERO,
            direction: Direction::Right,
            is_jumping: false,
            is_crawling: false,
            is_web_shooting: false,
            is_zipping: false,
            is_on_wall: false,
            can_double_jump: true,
            score: 0,
            high_score: 0,
            web_energy: WEB_ENERGY_MAX,
            combo: 0,
            last_catch_time_ms: 0.0,
            phase: GamePhase::Menu,
            difficulty: 1.0,
            active_power_ups: Vec::new(),
            screen_shake: 0.0,
            screen_shake_dir: Vec2::ZERO,
            screen_flash: None,
            freeze_frame_ms: 0.0,
            webs: Vec::new(),
            prey: Vec::new(),
            particles: Vec::new(),
            score_popups: Vec::new(),
            power_ups: Vec::new(),
            mouse_pos: Vec2::ZERO,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            next_id: 1,
        }
    }

    /// Monotonic simulation clock in milliseconds
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * TICK_MS
    }

    /// Y coordinate of the ground line the spider walks on
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether a timed buff of this kind is currently active
    #[inline]
    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.iter().any(|p| p.kind == kind)
    }

    /// Rebuild the RNG from the stored seed (call after deserializing)
    pub fn reseed(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }

    /// Prey spawn interval at the current difficulty, for the external
    /// spawn timer. Higher difficulty spawns faster, floored to keep the
    /// screen from flooding.
    pub fn spawn_interval_ms(&self) -> f64 {
        (PREY_SPAWN_INTERVAL_MS / self.difficulty as f64).max(PREY_SPAWN_INTERVAL_MIN_MS)
    }

    // --- Game flow ---

    /// Begin a run: wipe everything except the high score and viewport,
    /// place the spider at center, enter `Playing`.
    pub fn start_game(&mut self) {
        let high_score = self.high_score;
        let (width, height) = (self.width, self.height);
        let mouse_pos = self.mouse_pos;
        // Entity ids keep counting across runs; popup/web ids from a previous
        // run must not collide with this one if the embedder holds stale refs.
        let next_id = self.next_id;
        let seed = self.seed.wrapping_add(self.time_ticks);

        *self = Self::new(seed);
        self.high_score = high_score;
        self.width = width;
        self.height = height;
        self.mouse_pos = mouse_pos;
        self.next_id = next_id;
        self.position = Vec2::new(width / 2.0, height / 2.0);
        self.phase = GamePhase::Playing;

        log::info!("run started (seed {seed})");
    }

    pub fn pause_game(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::debug!("paused at tick {}", self.time_ticks);
        }
    }

    pub fn resume_game(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::debug!("resumed at tick {}", self.time_ticks);
        }
    }

    /// End the run and fold the score into the session high score. Nothing
    /// in the simulation calls this on its own; when a run ends is the
    /// embedder's call (timer, lives, quit button).
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if self.score > self.high_score {
            log::info!("new high score: {} (was {})", self.score, self.high_score);
            self.high_score = self.score;
        } else {
            log::info!("run ended with score {}", self.score);
        }
        self.phase = GamePhase::GameOver;
    }

    /// Back to the menu with everything reset except the high score
    pub fn reset_game(&mut self) {
        let high_score = self.high_score;
        let (width, height) = (self.width, self.height);
        let mouse_pos = self.mouse_pos;
        let next_id = self.next_id;
        let seed = self.seed.wrapping_add(self.time_ticks);

        *self = Self::new(seed);
        self.high_score = high_score;
        self.width = width;
        self.height = height;
        self.mouse_pos = mouse_pos;
        self.next_id = next_id;
    }
}
