use std::env;
use std::rc::Rc;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use snowfall::constants::demo::{FRAMES, SEED_VAR};
use snowfall::constants::physics::FRAME_TIME_MS;
use snowfall::events::EventCenter;
use snowfall::game::Game;
use snowfall::hud::Hud;
use snowfall::input::Buttons;
use snowfall::level::DEMO_LEVEL;
use snowfall::logging;

/// Seeds from `SNOWFALL_SEED` when set, otherwise from the thread RNG.
fn demo_rng() -> Result<SmallRng> {
    match env::var(SEED_VAR) {
        Ok(raw) => {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got {raw:?}"))?;
            info!(seed, "Using fixed seed");
            Ok(SmallRng::seed_from_u64(seed))
        }
        Err(_) => Ok(SmallRng::from_rng(&mut rand::rng())),
    }
}

/// Scripted player: keeps walking right and hops every 50 frames.
fn scripted_input(frame: u64) -> Buttons {
    let mut held = Buttons::RIGHT;
    if frame % 50 < 12 {
        held |= Buttons::JUMP;
    }
    held
}

fn main() -> Result<()> {
    logging::setup_subscriber().context("failed to install the tracing subscriber")?;

    let events = Rc::new(EventCenter::new());
    let hud = Hud::new(Rc::clone(&events));
    let mut game = Game::new(DEMO_LEVEL.to_vec(), Rc::clone(&events), demo_rng()?)?;

    info!(frames = FRAMES, "Starting headless demo");
    let mut restarted = false;
    for frame in 0..FRAMES {
        game.tick(scripted_input(frame), FRAME_TIME_MS)?;
        hud.update(FRAME_TIME_MS);

        if hud.has_won() {
            info!(frame, stars = hud.stars(), "Goal reached");
            break;
        }

        if hud.is_game_over() && !restarted {
            restarted = true;
            hud.request_restart();
        }

        if frame % 60 == 0 {
            let position = game.level().physics().borrow().position(game.player().body());
            debug!(frame, state = ?game.player().state(), ?position, health = hud.displayed_health(), "Demo progress");
        }
    }

    info!(
        frames = game.frames(),
        stars = hud.stars(),
        health = game.player().health().value(),
        won = hud.has_won(),
        "Demo finished"
    );
    Ok(())
}
