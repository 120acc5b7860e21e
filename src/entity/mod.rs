//! Stateful entities: the player and the snowmen.
//!
//! Each controller owns a [`StateMachine`](crate::state_machine::StateMachine) whose hooks operate
//! on the controller's data, and holds non-owning handles to the physics world and the event bus.

pub mod direction;
pub mod player;
pub mod snowman;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::physics::{BodyId, PhysicsWorld};

pub use direction::Direction;

/// Shared handle to the physics world.
pub type SharedPhysics = Rc<RefCell<PhysicsWorld>>;

/// Identifies a snowman by its physics body.
pub type EnemyId = BodyId;

/// A controller's view of its own physics body.
///
/// State hooks cannot fail, so writes to a body that no longer exists are logged and dropped.
#[derive(Debug, Clone)]
pub struct BodyHandle {
    id: BodyId,
    physics: SharedPhysics,
}

impl BodyHandle {
    pub fn new(id: BodyId, physics: SharedPhysics) -> Self {
        Self { id, physics }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn physics(&self) -> &SharedPhysics {
        &self.physics
    }

    pub fn position(&self) -> Option<glam::Vec2> {
        self.physics.borrow().position(self.id)
    }

    pub fn velocity(&self) -> Option<glam::Vec2> {
        self.physics.borrow().velocity(self.id)
    }

    pub fn set_velocity_x(&self, x: f32) {
        if let Err(e) = self.physics.borrow_mut().set_velocity_x(self.id, x) {
            warn!(error = %e, "Dropped horizontal velocity write");
        }
    }

    pub fn set_velocity_y(&self, y: f32) {
        if let Err(e) = self.physics.borrow_mut().set_velocity_y(self.id, y) {
            warn!(error = %e, "Dropped vertical velocity write");
        }
    }
}
