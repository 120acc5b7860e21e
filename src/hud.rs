//! Heads-up display state, driven entirely by bus events.

use std::cell::{Ref, RefCell};
use std::f32::consts::PI;
use std::rc::Rc;

use tracing::{debug, info};

use crate::constants::{health, hud};
use crate::error::EventError;
use crate::events::{ContextId, EventKind, GameEvent, SharedEvents};

/// The health bar's displayed value, animating toward the last reported value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    from: f32,
    to: f32,
    elapsed_ms: f32,
}

impl Default for HealthBar {
    fn default() -> Self {
        let full = health::MAX as f32;
        Self {
            from: full,
            to: full,
            elapsed_ms: hud::HEALTH_TWEEN_MS,
        }
    }
}

impl HealthBar {
    /// Starts animating from the currently displayed value toward `value`.
    pub fn retarget(&mut self, value: u8) {
        self.from = self.displayed();
        self.to = value as f32;
        self.elapsed_ms = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt).min(hud::HEALTH_TWEEN_MS);
    }

    /// Current value on a sine in-out curve between the previous and the reported value.
    pub fn displayed(&self) -> f32 {
        let t = (self.elapsed_ms / hud::HEALTH_TWEEN_MS).clamp(0.0, 1.0);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * sine_in_out(t)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Width of the filled part of the bar, in pixels.
    pub fn fill_width(&self) -> f32 {
        (self.displayed() * 2.0).clamp(0.0, hud::BAR_WIDTH)
    }
}

fn sine_in_out(t: f32) -> f32 {
    0.5 - 0.5 * (PI * t).cos()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HudState {
    pub stars: u32,
    pub health: HealthBar,
    pub game_over: bool,
    pub won: bool,
}

impl HudState {
    fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::HealthChanged(value) => {
                self.health.retarget(value);
                if value == 0 && !self.game_over {
                    info!("Game over");
                    self.game_over = true;
                }
            }
            GameEvent::StarCollected => {
                self.stars += 1;
                debug!(stars = self.stars, "Star counter updated");
            }
            GameEvent::GameWin => self.won = true,
            GameEvent::RestartGame => *self = Self::default(),
            GameEvent::SnowmanStomped(_) => {}
        }
    }
}

/// Subscribes a [`HudState`] to the bus for as long as it lives.
#[derive(Debug)]
pub struct Hud {
    state: Rc<RefCell<HudState>>,
    events: SharedEvents,
    context: ContextId,
}

impl Hud {
    pub fn new(events: SharedEvents) -> Self {
        let state = Rc::new(RefCell::new(HudState::default()));
        let context = events.new_context();

        for kind in [
            EventKind::HealthChanged,
            EventKind::StarCollected,
            EventKind::GameWin,
            EventKind::RestartGame,
        ] {
            let state = Rc::clone(&state);
            events.on(kind, context, move |event| {
                state.try_borrow_mut().map_err(|_| EventError::Busy)?.apply(event);
                Ok(())
            });
        }

        Self { state, events, context }
    }

    /// Advances the health bar animation.
    pub fn update(&self, dt: f32) {
        self.state.borrow_mut().health.advance(dt);
    }

    /// Asks the game to restart the level. Takes effect on the next tick.
    pub fn request_restart(&self) {
        info!("Restart requested");
        self.events.emit(GameEvent::RestartGame);
    }

    pub fn state(&self) -> Ref<'_, HudState> {
        self.state.borrow()
    }

    pub fn stars(&self) -> u32 {
        self.state.borrow().stars
    }

    pub fn displayed_health(&self) -> f32 {
        self.state.borrow().health.displayed()
    }

    pub fn fill_width(&self) -> f32 {
        self.state.borrow().health.fill_width()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.borrow().game_over
    }

    pub fn has_won(&self) -> bool {
        self.state.borrow().won
    }
}

impl Drop for Hud {
    fn drop(&mut self) {
        self.events.off_context(self.context);
    }
}
