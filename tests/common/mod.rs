#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use snowfall::entity::player::{Health, PlayerController};
use snowfall::entity::SharedPhysics;
use snowfall::events::{EventCenter, EventKind, GameEvent, SharedEvents};
use snowfall::input::{Buttons, InputState};
use snowfall::physics::{BodyData, BodyDesc, BodyId, PhysicsWorld};

/// One reference frame, in milliseconds.
pub const FRAME: f32 = 1000.0 / 60.0;

pub fn physics() -> SharedPhysics {
    Rc::new(RefCell::new(PhysicsWorld::default()))
}

/// A world without gravity, so bodies stay where they are put.
pub fn still_physics() -> SharedPhysics {
    Rc::new(RefCell::new(PhysicsWorld::new(0.0)))
}

pub fn events() -> SharedEvents {
    Rc::new(EventCenter::new())
}

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

pub fn dynamic_body(physics: &SharedPhysics, position: Vec2) -> BodyId {
    physics
        .borrow_mut()
        .add_body(BodyDesc::dynamic(position, Vec2::new(28.0, 40.0)).with_fixed_rotation())
}

pub fn ground(physics: &SharedPhysics, position: Vec2) -> BodyId {
    physics
        .borrow_mut()
        .add_body(BodyDesc::solid(position, Vec2::new(400.0, 40.0)).with_data(BodyData::Terrain))
}

pub fn pickup(physics: &SharedPhysics, position: Vec2, data: BodyData) -> BodyId {
    physics
        .borrow_mut()
        .add_body(BodyDesc::sensor(position, Vec2::new(24.0, 24.0)).with_data(data))
}

/// A player standing at the origin of a gravity-free world.
pub fn player(physics: &SharedPhysics, events: &SharedEvents, health: Health) -> PlayerController {
    let body = dynamic_body(physics, Vec2::ZERO);
    PlayerController::with_health(body, Rc::clone(physics), Rc::clone(events), health).unwrap()
}

/// Input with `held` down this frame and nothing the frame before.
pub fn pressed(held: Buttons) -> InputState {
    let mut input = InputState::default();
    input.advance(held);
    input
}

/// Input with `held` down both this frame and the frame before.
pub fn holding(held: Buttons) -> InputState {
    let mut input = pressed(held);
    input.advance(held);
    input
}

/// Records every event of `kind` emitted on `events`.
pub fn record(events: &SharedEvents, kind: EventKind) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let context = events.new_context();
    events.on(kind, context, move |event| {
        sink.borrow_mut().push(*event);
        Ok(())
    });
    log
}

pub fn velocity(physics: &SharedPhysics, body: BodyId) -> Vec2 {
    physics.borrow().velocity(body).unwrap()
}
