//! The gameplay event bus.
//!
//! Gameplay code raises [`GameEvent`]s on an [`EventCenter`]; presentation code (the HUD) and other
//! entities subscribe to them. The bus is an ordinary value, constructed by the top-level assembly
//! and shared by handle ([`SharedEvents`]).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use strum_macros::{Display, EnumString, IntoStaticStr};
use tracing::{error, trace, warn};

use crate::error::EventError;
use crate::physics::BodyId;

/// Shared handle to the bus.
pub type SharedEvents = Rc<EventCenter>;

/// Everything that can be announced on the bus, with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player's health changed; carries the new value (0-100).
    HealthChanged(u8),
    StarCollected,
    /// A snowman was defeated by a stomp; carries the snowman's body.
    SnowmanStomped(BodyId),
    GameWin,
    RestartGame,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::HealthChanged(_) => EventKind::HealthChanged,
            GameEvent::StarCollected => EventKind::StarCollected,
            GameEvent::SnowmanStomped(_) => EventKind::SnowmanStomped,
            GameEvent::GameWin => EventKind::GameWin,
            GameEvent::RestartGame => EventKind::RestartGame,
        }
    }
}

/// The name of an event, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    HealthChanged,
    StarCollected,
    SnowmanStomped,
    GameWin,
    RestartGame,
}

/// Identifies one registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Identifies the owner of a group of subscriptions, so they can be removed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

/// A subscriber callback. Errors are logged by the bus and do not stop delivery to others.
pub type EventCallback = Box<dyn FnMut(&GameEvent) -> Result<(), EventError>>;

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    context: ContextId,
    once: bool,
    active: Cell<bool>,
    callback: RefCell<EventCallback>,
}

/// A synchronous publish/subscribe bus.
///
/// Subscribers are notified in registration order. Emission works on a snapshot: subscribers added
/// while an event is being delivered only see later events, and subscribers removed during delivery
/// are skipped from that point on.
#[derive(Default)]
pub struct EventCenter {
    subscribers: RefCell<Vec<Rc<Subscriber>>>,
    next_subscription: Cell<u64>,
    next_context: Cell<u64>,
}

impl EventCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh owner context.
    pub fn new_context(&self) -> ContextId {
        let id = self.next_context.get();
        self.next_context.set(id + 1);
        ContextId(id)
    }

    /// Registers a persistent subscriber.
    pub fn on<F>(&self, kind: EventKind, context: ContextId, callback: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Result<(), EventError> + 'static,
    {
        self.subscribe(kind, context, false, Box::new(callback))
    }

    /// Registers a subscriber that is removed right before its first invocation.
    pub fn once<F>(&self, kind: EventKind, context: ContextId, callback: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Result<(), EventError> + 'static,
    {
        self.subscribe(kind, context, true, Box::new(callback))
    }

    /// Removes a subscription. Returns `false` if it was not registered for `kind`.
    pub fn off(&self, kind: EventKind, subscription: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let Some(index) = subscribers
            .iter()
            .position(|subscriber| subscriber.id == subscription && subscriber.kind == kind)
        else {
            return false;
        };

        let removed = subscribers.remove(index);
        removed.active.set(false);
        trace!(event = %kind, subscription = %subscription, "Unsubscribed");
        true
    }

    /// Removes every subscription owned by `context`. Returns how many were removed.
    pub fn off_context(&self, context: ContextId) -> usize {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|subscriber| {
            let keep = subscriber.context != context;
            if !keep {
                subscriber.active.set(false);
            }
            keep
        });
        before - subscribers.len()
    }

    /// Delivers `event` to every subscriber of its kind. Returns how many callbacks ran.
    pub fn emit(&self, event: GameEvent) -> usize {
        let kind = event.kind();
        let snapshot: SmallVec<[Rc<Subscriber>; 8]> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|subscriber| subscriber.kind == kind)
            .cloned()
            .collect();

        trace!(event = %kind, subscribers = snapshot.len(), "Emitting event");

        let mut invoked = 0;
        for subscriber in snapshot {
            if !subscriber.active.get() {
                continue;
            }

            let Ok(mut callback) = subscriber.callback.try_borrow_mut() else {
                warn!(event = %kind, subscription = %subscriber.id, "Skipping re-entrant delivery to a running subscriber");
                continue;
            };

            // Unregistered only once it is certain to run
            if subscriber.once {
                self.off(kind, subscriber.id);
            }

            invoked += 1;
            if let Err(e) = callback(&event) {
                error!(event = %kind, subscription = %subscriber.id, error = %e, "Event subscriber failed");
            }
        }

        invoked
    }

    /// Number of live subscriptions for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|subscriber| subscriber.kind == kind)
            .count()
    }

    fn subscribe(&self, kind: EventKind, context: ContextId, once: bool, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);

        self.subscribers.borrow_mut().push(Rc::new(Subscriber {
            id,
            kind,
            context,
            once,
            active: Cell::new(true),
            callback: RefCell::new(callback),
        }));

        trace!(event = %kind, subscription = %id, once, "Subscribed");
        id
    }
}

impl fmt::Debug for EventCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCenter")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}
