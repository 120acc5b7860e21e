use std::rc::Rc;

use glam::Vec2;
use pretty_assertions::assert_eq;
use snowfall::entity::snowman::{SharedSnowman, SnowmanController, SnowmanState};
use snowfall::entity::SharedPhysics;
use snowfall::events::{EventKind, GameEvent, SharedEvents};
use snowfall::physics::BodyId;
use snowfall::presentation::Animation;
use speculoos::prelude::*;

mod common;

fn spawn(physics: &SharedPhysics, events: &SharedEvents, seed: u64) -> SharedSnowman {
    let body = common::dynamic_body(physics, Vec2::ZERO);
    SnowmanController::spawn(body, Rc::clone(physics), Rc::clone(events), common::rng(seed)).unwrap()
}

fn opposite(state: SnowmanState) -> SnowmanState {
    match state {
        SnowmanState::MoveLeft => SnowmanState::MoveRight,
        SnowmanState::MoveRight => SnowmanState::MoveLeft,
        other => panic!("not a patrol state: {other}"),
    }
}

#[test]
fn test_starts_patrolling() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 1);
    let snowman = snowman.borrow();

    let state = snowman.state().unwrap();
    assert_that(&[SnowmanState::MoveLeft, SnowmanState::MoveRight].contains(&state)).is_true();
    assert_eq!(snowman.move_time(), 0.0);
    assert_that(&snowman.is_subscribed()).is_true();
}

#[test]
fn test_initial_direction_is_deterministic_for_a_seed() {
    let (physics, events) = (common::still_physics(), common::events());
    let first = spawn(&physics, &events, 42).borrow().state();
    let second = spawn(&physics, &events, 42).borrow().state();
    assert_eq!(first, second);
}

#[test]
fn test_patrol_moves_at_walking_speed() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 7);
    let state = snowman.borrow().state().unwrap();

    snowman.borrow_mut().update(16.0).unwrap();

    let expected = match state {
        SnowmanState::MoveLeft => -5.0,
        _ => 5.0,
    };
    assert_eq!(common::velocity(&physics, snowman.borrow().body()).x, expected);
    let animation = snowman.borrow().sprite().animation;
    assert_that(&matches!(
        animation,
        Some(Animation::SnowmanMoveLeft | Animation::SnowmanMoveRight)
    ))
    .is_true();
}

#[test]
fn test_patrol_turns_around_after_dwell_time() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 3);
    let start = snowman.borrow().state().unwrap();

    snowman.borrow_mut().update(1999.0).unwrap();
    assert_eq!(snowman.borrow().state(), Some(start));
    assert_eq!(snowman.borrow().move_time(), 1999.0);

    snowman.borrow_mut().update(1.0).unwrap();
    assert_eq!(snowman.borrow().state(), Some(opposite(start)));
    assert_eq!(snowman.borrow().move_time(), 0.0);

    // The accumulator starts over in the new direction
    snowman.borrow_mut().update(2000.0).unwrap();
    assert_eq!(snowman.borrow().state(), Some(start));
}

#[test]
fn test_stomp_defeats_only_the_matching_snowman() {
    let (physics, events) = (common::still_physics(), common::events());
    let target = spawn(&physics, &events, 1);
    let bystander = spawn(&physics, &events, 2);

    let stomped = target.borrow().body();
    assert_eq!(events.emit(GameEvent::SnowmanStomped(stomped)), 2);

    let target = target.borrow();
    assert_that(&target.is_dead()).is_true();
    assert_that(&target.is_subscribed()).is_false();
    assert_eq!(common::velocity(&physics, stomped).x, 0.0);
    assert_that(&target.sprite().playing).is_false();
    assert_that(&target.sprite().shrink).is_some();

    let bystander = bystander.borrow();
    assert_that(&bystander.is_dead()).is_false();
    assert_that(&bystander.is_subscribed()).is_true();
    assert_eq!(events.subscriber_count(EventKind::SnowmanStomped), 1);
}

#[test]
fn test_unknown_identity_is_ignored() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 1);

    events.emit(GameEvent::SnowmanStomped(BodyId::from_raw(999)));

    assert_that(&snowman.borrow().is_dead()).is_false();
}

#[test]
fn test_defeat_is_idempotent() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 1);
    let body = snowman.borrow().body();

    events.emit(GameEvent::SnowmanStomped(body));
    assert_eq!(events.emit(GameEvent::SnowmanStomped(body)), 0);

    // A direct second defeat is a no-op as well
    assert_that(&snowman.borrow_mut().handle_stomped(body)).is_ok();
    assert_eq!(snowman.borrow().state(), Some(SnowmanState::Dead));
}

#[test]
fn test_dead_snowman_expires_after_shrink() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 1);
    let body = snowman.borrow().body();
    events.emit(GameEvent::SnowmanStomped(body));

    snowman.borrow_mut().update(100.0).unwrap();
    assert_that(&snowman.borrow().is_expired()).is_false();

    snowman.borrow_mut().update(100.0).unwrap();
    assert_that(&snowman.borrow().is_expired()).is_true();
    assert_eq!(common::velocity(&physics, body).x, 0.0);
}

#[test]
fn test_dropping_unsubscribes() {
    let (physics, events) = (common::still_physics(), common::events());
    let snowman = spawn(&physics, &events, 1);
    let body = snowman.borrow().body();
    assert_eq!(events.subscriber_count(EventKind::SnowmanStomped), 1);

    drop(snowman);

    assert_eq!(events.subscriber_count(EventKind::SnowmanStomped), 0);
    assert_eq!(events.emit(GameEvent::SnowmanStomped(body)), 0);
}
