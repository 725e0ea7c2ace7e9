//! Spider Hunt entry point
//!
//! Headless demo: runs the simulation at a fixed 60 Hz step with a small
//! scripted hunter, then reports the final score.

use spider_hunt::consts::*;
use spider_hunt::{GameState, HighScore};

/// Demo run length in ticks (60 seconds at 60 Hz)
const DEMO_TICKS: u64 = 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Spider Hunt (headless demo) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut high_score = HighScore::load(HighScore::DEFAULT_PATH);

    let mut state = GameState::new(seed);
    state.high_score = high_score.score;
    state.start_game();

    let mut last_spawn_ms = 0.0;
    for _ in 0..DEMO_TICKS {
        let now = state.now_ms();

        // Keep the arena stocked, same cadence the difficulty curve dictates
        if now - last_spawn_ms >= state.spawn_interval_ms() {
            state.spawn_prey();
            last_spawn_ms = now;
        }

        run_bot(&mut state);
        state.tick();
    }

    state.end_game();
    log::info!(
        "demo finished: score {} (best {}), difficulty {:.2}",
        state.score,
        state.high_score,
        state.difficulty
    );

    if high_score.record(state.score) {
        log::info!("new record!");
    }
    high_score.save(HighScore::DEFAULT_PATH);

    println!(
        "score: {}  high score: {}  prey left: {}",
        state.score,
        high_score.score,
        state.prey.len()
    );
}

/// Scripted hunter: web the nearest free prey, zip toward anything trapped,
/// and walk under whatever is closest.
fn run_bot(state: &mut GameState) {
    let spider = state.position;

    let nearest_free = state
        .prey
        .iter()
        .filter(|p| !p.is_trapped)
        .min_by(|a, b| {
            spider
                .distance_squared(a.pos)
                .total_cmp(&spider.distance_squared(b.pos))
        })
        .map(|p| p.pos);

    let nearest_trapped = state
        .prey
        .iter()
        .filter(|p| p.is_trapped)
        .min_by(|a, b| {
            spider
                .distance_squared(a.pos)
                .total_cmp(&spider.distance_squared(b.pos))
        })
        .map(|p| p.pos);

    if let Some(target) = nearest_trapped {
        // Close the distance on a trapped meal
        if spider.distance(target) >= MIN_ZIP_DISTANCE && state.web_energy >= WEB_ZIP_COST {
            state.zip_to(target);
        } else {
            let dx = (target.x - spider.x).clamp(-3.0, 3.0);
            state.set_velocity(Some(dx), None);
        }
    } else if let Some(target) = nearest_free {
        if state.web_energy >= WEB_SHOOT_COST && spider.distance(target) > CATCH_RADIUS {
            state.shoot_web(target);
        }
        let dx = (target.x - spider.x).clamp(-2.0, 2.0);
        state.set_velocity(Some(dx), None);
    } else {
        state.set_velocity(Some(0.0), None);
    }

    // Grab any power-up that drifts close
    if let Some(pickup) = state
        .power_ups
        .iter()
        .min_by(|a, b| {
            spider
                .distance_squared(a.pos)
                .total_cmp(&spider.distance_squared(b.pos))
        })
        .map(|p| p.pos)
    {
        if spider.distance(pickup) >= MIN_ZIP_DISTANCE
            && spider.distance(pickup) < 200.0
            && state.web_energy >= WEB_ZIP_COST
        {
            state.zip_to(pickup);
        }
    }
}
