//! Button state as seen by gameplay code.
//!
//! Device polling is left to the host; each frame it hands over the set of held [`Buttons`] and
//! [`InputState`] derives edges (just pressed) by comparing with the previous frame.

use bitflags::bitflags;

use crate::entity::Direction;

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP = 1 << 2;
    }
}

/// Held buttons for the current frame and the one before it.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputState {
    held: Buttons,
    previous: Buttons,
}

impl InputState {
    /// Starts a new frame with `held` as the set of buttons currently down.
    pub fn advance(&mut self, held: Buttons) {
        self.previous = self.held;
        self.held = held;
    }

    pub fn held(&self) -> Buttons {
        self.held
    }

    pub fn is_down(&self, button: Buttons) -> bool {
        self.held.contains(button)
    }

    pub fn is_up(&self, button: Buttons) -> bool {
        !self.held.intersects(button)
    }

    /// Whether `button` went down this frame.
    pub fn just_pressed(&self, button: Buttons) -> bool {
        self.held.contains(button) && !self.previous.contains(button)
    }

    /// The horizontal direction being held. Left wins when both are down.
    pub fn horizontal(&self) -> Option<Direction> {
        if self.is_down(Buttons::LEFT) {
            Some(Direction::Left)
        } else if self.is_down(Buttons::RIGHT) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}
