use pretty_assertions::assert_eq;
use snowfall::events::{EventKind, GameEvent};
use snowfall::hud::Hud;
use speculoos::prelude::*;

mod common;

#[test]
fn test_starts_with_full_health() {
    let hud = Hud::new(common::events());

    assert_eq!(hud.displayed_health(), 100.0);
    assert_eq!(hud.fill_width(), 200.0);
    assert_eq!(hud.stars(), 0);
    assert_that(&hud.is_game_over()).is_false();
}

#[test]
fn test_health_bar_animates_to_reported_value() {
    let events = common::events();
    let hud = Hud::new(events.clone());

    events.emit(GameEvent::HealthChanged(50));
    assert_eq!(hud.displayed_health(), 100.0);

    hud.update(50.0);
    assert_that(&hud.displayed_health()).is_close_to(92.68, 0.01);

    hud.update(50.0);
    assert_that(&hud.displayed_health()).is_close_to(75.0, 0.01);

    hud.update(100.0);
    assert_eq!(hud.displayed_health(), 50.0);
    assert_eq!(hud.fill_width(), 100.0);
}

#[test]
fn test_counts_stars() {
    let events = common::events();
    let hud = Hud::new(events.clone());

    for _ in 0..3 {
        events.emit(GameEvent::StarCollected);
    }

    assert_eq!(hud.stars(), 3);
}

#[test]
fn test_zero_health_is_game_over() {
    let events = common::events();
    let hud = Hud::new(events.clone());

    events.emit(GameEvent::HealthChanged(0));
    hud.update(200.0);

    assert_that(&hud.is_game_over()).is_true();
    assert_eq!(hud.fill_width(), 0.0);
}

#[test]
fn test_win_and_restart() {
    let events = common::events();
    let hud = Hud::new(events.clone());
    events.emit(GameEvent::StarCollected);
    events.emit(GameEvent::GameWin);
    assert_that(&hud.has_won()).is_true();

    let restarts = common::record(&events, EventKind::RestartGame);
    hud.request_restart();

    assert_eq!(restarts.borrow().len(), 1);
    assert_that(&hud.has_won()).is_false();
    assert_eq!(hud.stars(), 0);
    assert_eq!(hud.displayed_health(), 100.0);
}

#[test]
fn test_dropping_unsubscribes() {
    let events = common::events();
    let hud = Hud::new(events.clone());
    assert_eq!(events.subscriber_count(EventKind::StarCollected), 1);

    drop(hud);

    assert_eq!(events.subscriber_count(EventKind::StarCollected), 0);
    assert_eq!(events.subscriber_count(EventKind::HealthChanged), 0);
}
