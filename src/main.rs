//! Lab Breach headless runner
//!
//! Plays one session with a simple autopilot and logs the outcome.
//! Usage: `lab-breach [seed]`. Settings are read from the JSON file named by
//! `LAB_BREACH_SETTINGS` if set; `LAB_BREACH_QUALITY` (low/medium/high)
//! overrides the quality preset.

use std::time::Duration;

use glam::Vec2;

use lab_breach::narration::{LlmNarrator, NarrationDispatcher};
use lab_breach::renderer::LogRenderer;
use lab_breach::sim::{GamePhase, GameState};
use lab_breach::{FrameDriver, ManualScheduler, QualityPreset, Settings};

/// Hard stop for sessions that never finish
const MAX_FRAMES: u64 = 36_000;
/// How far the autopilot looks for food
const HUNT_RADIUS: f32 = 600.0;

fn main() {
    env_logger::init();
    log::info!("Lab Breach (headless) starting...");

    let mut settings = match std::env::var("LAB_BREACH_SETTINGS") {
        Ok(path) => Settings::load_or_default(path),
        Err(_) => Settings::default(),
    };
    if let Ok(value) = std::env::var("LAB_BREACH_QUALITY") {
        match QualityPreset::parse(&value) {
            Some(preset) => settings.quality = preset,
            None => log::warn!(
                "Unknown quality preset {:?}, keeping {}",
                value,
                settings.quality.as_str()
            ),
        }
    }
    log::info!(
        "Quality {} ({} particles max)",
        settings.quality.as_str(),
        settings.max_particles()
    );
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(1);

    // Narration needs a runtime for its detached tasks
    let runtime = if settings.narration {
        match tokio::runtime::Runtime::new() {
            Ok(rt) => Some(rt),
            Err(e) => {
                log::warn!("Could not start narration runtime: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut driver = FrameDriver::new(settings.clone(), ManualScheduler::new());
    driver.set_renderer(Box::new(LogRenderer::new(seed, 120)));
    driver.on_phase(|phase| log::info!("Phase: {:?}", phase));
    driver.on_stats(|stats| log::trace!("Size {:.1}, eaten {}", stats.size, stats.eaten));

    if let Some(rt) = runtime.as_ref() {
        let narrator = match LlmNarrator::from_env() {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("{}; narration will use fallback lines", e);
                None
            }
        };
        let timeout = Duration::from_millis(settings.narration_timeout_ms);
        driver.set_narration(Box::new(NarrationDispatcher::new(
            narrator,
            rt.handle().clone(),
            timeout,
        )));
    }

    driver.start(seed);
    while driver.state().is_some_and(|s| s.frame < MAX_FRAMES) {
        if let Some(state) = driver.state() {
            let intent = autopilot(state);
            driver.input.set_joystick(intent.x, intent.y);
        }
        if !driver.pump() {
            break;
        }
    }

    if let Some(rt) = runtime.as_ref() {
        // Every request resolves (or falls back) within the timeout
        let grace = Duration::from_millis(settings.narration_timeout_ms + 250);
        rt.block_on(tokio::time::sleep(grace));
        driver.poll_narration();
    }

    let Some(state) = driver.state() else {
        return;
    };
    let outcome = match state.phase {
        GamePhase::Victory => "escaped",
        GamePhase::Defeat => "was contained",
        _ => "is still loose",
    };
    log::info!(
        "Subject 09 {} after {} frames: level {}, radius {:.1}, {} eaten, {} walls, {} props, {} shots fired",
        outcome,
        state.frame,
        state.monster.level,
        state.monster.radius,
        state.stats.humans_eaten,
        state.stats.walls_broken,
        state.stats.props_smashed,
        state.stats.shots_fired
    );
    for line in driver.log_lines() {
        log::info!("> {}", line);
    }
}

/// Chase the nearest human in range, otherwise head for the outer edge
fn autopilot(state: &GameState) -> Vec2 {
    let pos = state.monster.pos;
    let prey = state
        .humans
        .iter()
        .map(|h| (h.pos, h.pos.distance(pos)))
        .filter(|(_, d)| *d < HUNT_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match prey {
        Some((target, _)) => (target - pos).normalize_or_zero(),
        None => {
            let outward = (pos - state.world_center).normalize_or_zero();
            if outward == Vec2::ZERO { Vec2::X } else { outward }
        }
    }
}
