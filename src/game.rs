//! This module contains the main game logic and state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::entity::player::PlayerController;
use crate::error::GameResult;
use crate::events::{ContextId, EventKind, SharedEvents};
use crate::formatter;
use crate::input::{Buttons, InputState};
use crate::level::{Level, SpawnMarker};
use crate::physics::PhysicsWorld;

/// Owns the running level and drives it one frame at a time.
#[derive(Debug)]
pub struct Game {
    events: SharedEvents,
    markers: Vec<SpawnMarker>,
    rng: SmallRng,
    level: Level,
    input: InputState,
    restart_requested: Rc<Cell<bool>>,
    context: ContextId,
    frames: u64,
}

impl Game {
    /// Builds the level from `markers` and starts listening for restart requests.
    pub fn new(markers: Vec<SpawnMarker>, events: SharedEvents, mut rng: SmallRng) -> GameResult<Self> {
        let level = Self::build_level(&markers, &events, &mut rng)?;

        let context = events.new_context();
        let restart_requested = Rc::new(Cell::new(false));
        let flag = Rc::clone(&restart_requested);
        events.on(EventKind::RestartGame, context, move |_| {
            flag.set(true);
            Ok(())
        });

        Ok(Self {
            events,
            markers,
            rng,
            level,
            input: InputState::default(),
            restart_requested,
            context,
            frames: 0,
        })
    }

    fn build_level(markers: &[SpawnMarker], events: &SharedEvents, rng: &mut SmallRng) -> GameResult<Level> {
        let physics = Rc::new(RefCell::new(PhysicsWorld::default()));
        Level::build(markers, physics, Rc::clone(events), rng)
    }

    /// Advances the game by `dt` milliseconds with `held` as the buttons currently down.
    ///
    /// A restart requested during the previous frame is applied before anything else runs.
    pub fn tick(&mut self, held: Buttons, dt: f32) -> GameResult<()> {
        formatter::increment_tick();
        self.frames += 1;

        if self.restart_requested.replace(false) {
            self.restart()?;
        }

        self.input.advance(held);
        self.level.advance(self.input, dt)
    }

    fn restart(&mut self) -> GameResult<()> {
        info!(frame = self.frames, "Restarting level");
        let level = Self::build_level(&self.markers, &self.events, &mut self.rng)?;
        // Replacing the level drops the old snowmen, which unsubscribes them
        self.level = level;
        self.input = InputState::default();
        debug!(snowmen = self.level.snowmen().len(), "Level rebuilt");
        Ok(())
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &PlayerController {
        self.level.player()
    }

    pub fn events(&self) -> &SharedEvents {
        &self.events
    }

    /// Number of ticks run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_restart_pending(&self) -> bool {
        self.restart_requested.get()
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.events.off_context(self.context);
    }
}
