use pretty_assertions::assert_eq;
use snowfall::entity::Direction;
use snowfall::input::{Buttons, InputState};
use speculoos::prelude::*;

#[test]
fn test_just_pressed_only_on_first_frame() {
    let mut input = InputState::default();

    input.advance(Buttons::JUMP);
    assert_that(&input.just_pressed(Buttons::JUMP)).is_true();

    input.advance(Buttons::JUMP);
    assert_that(&input.just_pressed(Buttons::JUMP)).is_false();
    assert_that(&input.is_down(Buttons::JUMP)).is_true();

    input.advance(Buttons::empty());
    assert_that(&input.is_up(Buttons::JUMP)).is_true();
}

#[test]
fn test_horizontal_direction() {
    let mut input = InputState::default();
    assert_eq!(input.horizontal(), None);

    input.advance(Buttons::RIGHT);
    assert_eq!(input.horizontal(), Some(Direction::Right));

    input.advance(Buttons::LEFT | Buttons::RIGHT);
    assert_eq!(input.horizontal(), Some(Direction::Left));
    assert_eq!(input.held(), Buttons::LEFT | Buttons::RIGHT);
}
