use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use snowfall::error::EventError;
use snowfall::events::{EventCenter, EventKind, GameEvent, SubscriptionId};
use snowfall::physics::BodyId;
use speculoos::prelude::*;

mod common;

#[test]
fn test_event_kind_names() {
    assert_eq!(GameEvent::HealthChanged(10).kind().to_string(), "health-changed");
    assert_eq!(GameEvent::StarCollected.kind().to_string(), "star-collected");
    assert_eq!(
        GameEvent::SnowmanStomped(BodyId::from_raw(3)).kind().to_string(),
        "snowman-stomped"
    );
    assert_eq!(GameEvent::GameWin.kind().to_string(), "game-win");
    assert_eq!(GameEvent::RestartGame.kind().to_string(), "restart-game");
    assert_eq!("game-win".parse::<EventKind>(), Ok(EventKind::GameWin));
}

#[test]
fn test_emit_without_subscribers() {
    let events = EventCenter::new();
    assert_eq!(events.emit(GameEvent::GameWin), 0);
}

#[test]
fn test_delivery_in_registration_order_with_payload() {
    let events = common::events();
    let order = Rc::new(RefCell::new(Vec::new()));
    let context = events.new_context();

    for tag in ["first", "second", "third"] {
        let order = Rc::clone(&order);
        events.on(EventKind::HealthChanged, context, move |event| {
            if let GameEvent::HealthChanged(value) = event {
                order.borrow_mut().push((tag, *value));
            }
            Ok(())
        });
    }

    assert_eq!(events.emit(GameEvent::HealthChanged(50)), 3);
    assert_eq!(*order.borrow(), vec![("first", 50), ("second", 50), ("third", 50)]);
}

#[test]
fn test_only_matching_kind_is_delivered() {
    let events = common::events();
    let stars = common::record(&events, EventKind::StarCollected);

    events.emit(GameEvent::GameWin);
    events.emit(GameEvent::StarCollected);

    assert_eq!(*stars.borrow(), vec![GameEvent::StarCollected]);
}

#[test]
fn test_off_stops_delivery() {
    let events = common::events();
    let count = Rc::new(Cell::new(0));
    let context = events.new_context();
    let counter = Rc::clone(&count);
    let id = events.on(EventKind::GameWin, context, move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    events.emit(GameEvent::GameWin);
    assert_that(&events.off(EventKind::GameWin, id)).is_true();
    events.emit(GameEvent::GameWin);

    assert_eq!(count.get(), 1);
    assert_eq!(events.subscriber_count(EventKind::GameWin), 0);
}

#[test]
fn test_off_unknown_subscription_is_a_no_op() {
    let events = common::events();
    let context = events.new_context();
    let id = events.on(EventKind::GameWin, context, |_| Ok(()));

    // Wrong kind for an existing id
    assert_that(&events.off(EventKind::StarCollected, id)).is_false();
    assert_that(&events.off(EventKind::GameWin, id)).is_true();
    assert_that(&events.off(EventKind::GameWin, id)).is_false();
}

#[test]
fn test_once_runs_a_single_time() {
    let events = common::events();
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    events.once(EventKind::StarCollected, events.new_context(), move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    events.emit(GameEvent::StarCollected);
    events.emit(GameEvent::StarCollected);

    assert_eq!(count.get(), 1);
    assert_eq!(events.subscriber_count(EventKind::StarCollected), 0);
}

#[test]
fn test_failing_subscriber_does_not_stop_delivery() {
    let events = common::events();
    let context = events.new_context();
    events.on(EventKind::GameWin, context, |_| Err(EventError::Subscriber("boom".into())));
    let after = common::record(&events, EventKind::GameWin);

    assert_eq!(events.emit(GameEvent::GameWin), 2);
    assert_eq!(after.borrow().len(), 1);
}

#[test]
fn test_subscriber_removed_during_emission_is_skipped() {
    let events = common::events();
    let context = events.new_context();
    let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

    let handle = Rc::clone(&events);
    let target = Rc::clone(&victim);
    events.on(EventKind::RestartGame, context, move |_| {
        if let Some(id) = target.get() {
            handle.off(EventKind::RestartGame, id);
        }
        Ok(())
    });

    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    let id = events.on(EventKind::RestartGame, context, move |_| {
        flag.set(true);
        Ok(())
    });
    victim.set(Some(id));

    assert_eq!(events.emit(GameEvent::RestartGame), 1);
    assert_that(&ran.get()).is_false();
}

#[test]
fn test_subscriber_removing_itself_is_not_called_again() {
    let events = common::events();
    let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
    let calls = Rc::new(Cell::new(0));

    let handle = Rc::clone(&events);
    let id_slot = Rc::clone(&own_id);
    let counter = Rc::clone(&calls);
    let id = events.on(EventKind::StarCollected, events.new_context(), move |_| {
        counter.set(counter.get() + 1);
        if let Some(id) = id_slot.get() {
            handle.off(EventKind::StarCollected, id);
        }
        Ok(())
    });
    own_id.set(Some(id));

    events.emit(GameEvent::StarCollected);
    events.emit(GameEvent::StarCollected);

    assert_eq!(calls.get(), 1);
    assert_eq!(events.subscriber_count(EventKind::StarCollected), 0);
}

#[test]
fn test_subscriber_added_during_emission_waits_for_next_event() {
    let events = common::events();
    let context = events.new_context();
    let late_calls = Rc::new(Cell::new(0));

    let handle = Rc::clone(&events);
    let calls = Rc::clone(&late_calls);
    events.once(EventKind::StarCollected, context, move |_| {
        let calls = Rc::clone(&calls);
        handle.on(EventKind::StarCollected, context, move |_| {
            calls.set(calls.get() + 1);
            Ok(())
        });
        Ok(())
    });

    events.emit(GameEvent::StarCollected);
    assert_eq!(late_calls.get(), 0);

    events.emit(GameEvent::StarCollected);
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn test_re_entrant_emission_skips_running_subscriber() {
    let events = common::events();
    let context = events.new_context();
    let depth = Rc::new(Cell::new(0));

    let handle = Rc::clone(&events);
    let calls = Rc::clone(&depth);
    events.on(EventKind::GameWin, context, move |_| {
        calls.set(calls.get() + 1);
        handle.emit(GameEvent::GameWin);
        Ok(())
    });

    events.emit(GameEvent::GameWin);
    assert_eq!(depth.get(), 1);
}

#[test]
fn test_off_context_removes_all_owned_subscriptions() {
    let events = common::events();
    let owner = events.new_context();
    let other = events.new_context();

    events.on(EventKind::GameWin, owner, |_| Ok(()));
    events.on(EventKind::StarCollected, owner, |_| Ok(()));
    events.on(EventKind::GameWin, other, |_| Ok(()));

    assert_eq!(events.off_context(owner), 2);
    assert_eq!(events.subscriber_count(EventKind::GameWin), 1);
    assert_eq!(events.subscriber_count(EventKind::StarCollected), 0);
}

#[test]
fn test_once_subscriber_re_emitting_its_event_runs_once() {
    let events = common::events();
    let calls = Rc::new(Cell::new(0));

    let handle = Rc::clone(&events);
    let counter = Rc::clone(&calls);
    events.once(EventKind::GameWin, events.new_context(), move |_| {
        counter.set(counter.get() + 1);
        handle.emit(GameEvent::GameWin);
        Ok(())
    });

    assert_eq!(events.emit(GameEvent::GameWin), 1);
    events.emit(GameEvent::GameWin);

    assert_eq!(calls.get(), 1);
    assert_eq!(events.subscriber_count(EventKind::GameWin), 0);
}
