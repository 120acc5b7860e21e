//! Patrolling snowman enemies.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::Rng;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::info;

use crate::constants::snowman::{PATROL_DWELL_MS, SHRINK_MS, SPEED};
use crate::entity::{BodyHandle, Direction, EnemyId, SharedPhysics};
use crate::error::{EventError, GameResult};
use crate::events::{ContextId, EventKind, GameEvent, SharedEvents, SubscriptionId};
use crate::physics::BodyId;
use crate::presentation::{Animation, Sprite};
use crate::state_machine::{StateHooks, StateMachine, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SnowmanState {
    Idle,
    MoveLeft,
    MoveRight,
    Dead,
}

impl SnowmanState {
    fn moving(direction: Direction) -> Self {
        match direction {
            Direction::Left => SnowmanState::MoveLeft,
            Direction::Right => SnowmanState::MoveRight,
        }
    }
}

/// Data the snowman's state hooks operate on.
#[derive(Debug)]
pub struct Snowman {
    body: BodyHandle,
    rng: SmallRng,
    /// Time spent walking in the current direction.
    move_time: f32,
    sprite: Sprite,
}

pub type SharedSnowman = Rc<RefCell<SnowmanController>>;

/// Drives one snowman and listens for its own defeat on the bus.
#[derive(Debug)]
pub struct SnowmanController {
    machine: StateMachine<SnowmanState, Snowman>,
    snowman: Snowman,
    events: SharedEvents,
    context: ContextId,
    stomp_subscription: Option<SubscriptionId>,
}

impl SnowmanController {
    /// Creates the controller, starts its patrol and subscribes it to `snowman-stomped`.
    pub fn spawn(body: BodyId, physics: SharedPhysics, events: SharedEvents, rng: SmallRng) -> GameResult<SharedSnowman> {
        let mut machine = StateMachine::new("snowman");
        machine
            .add_state(SnowmanState::Idle, StateHooks::new().with_enter(idle_on_enter))?
            .add_state(
                SnowmanState::MoveLeft,
                StateHooks::new()
                    .with_enter(move_left_on_enter)
                    .with_update(move_left_on_update),
            )?
            .add_state(
                SnowmanState::MoveRight,
                StateHooks::new()
                    .with_enter(move_right_on_enter)
                    .with_update(move_right_on_update),
            )?
            .add_state(SnowmanState::Dead, StateHooks::terminal().with_enter(dead_on_enter))?;

        let mut snowman = Snowman {
            body: BodyHandle::new(body, physics),
            rng,
            move_time: 0.0,
            sprite: Sprite::default(),
        };
        machine.set_state(&mut snowman, SnowmanState::Idle)?;

        let context = events.new_context();
        let controller = Rc::new(RefCell::new(Self {
            machine,
            snowman,
            events: Rc::clone(&events),
            context,
            stomp_subscription: None,
        }));

        let weak = Rc::downgrade(&controller);
        let subscription = events.on(EventKind::SnowmanStomped, context, move |event| {
            let GameEvent::SnowmanStomped(enemy) = *event else {
                return Ok(());
            };
            let Some(controller) = weak.upgrade() else {
                return Ok(());
            };

            let mut controller = controller.try_borrow_mut().map_err(|_| EventError::Busy)?;
            let result = controller.handle_stomped(enemy);
            result.map_err(|e| EventError::Subscriber(e.to_string()))
        });
        controller.borrow_mut().stomp_subscription = Some(subscription);

        Ok(controller)
    }

    /// Defeat protocol: only the stomped snowman reacts, and only once.
    pub fn handle_stomped(&mut self, enemy: EnemyId) -> GameResult<()> {
        if enemy != self.snowman.body.id() {
            return Ok(());
        }

        if let Some(subscription) = self.stomp_subscription.take() {
            self.events.off(EventKind::SnowmanStomped, subscription);
        }

        if self.machine.is_current_state(SnowmanState::Dead) {
            return Ok(());
        }

        info!(snowman = %enemy, "Snowman defeated");
        self.machine.set_state(&mut self.snowman, SnowmanState::Dead)?;
        Ok(())
    }

    pub fn update(&mut self, dt: f32) -> GameResult<()> {
        self.snowman.sprite.update(dt);
        self.machine.update(&mut self.snowman, dt)?;
        Ok(())
    }

    pub fn state(&self) -> Option<SnowmanState> {
        self.machine.current()
    }

    pub fn is_dead(&self) -> bool {
        self.machine.is_current_state(SnowmanState::Dead)
    }

    /// Dead and done shrinking; the level may release it.
    pub fn is_expired(&self) -> bool {
        self.is_dead() && self.snowman.sprite.shrink.is_some_and(|shrink| shrink.is_finished())
    }

    pub fn body(&self) -> EnemyId {
        self.snowman.body.id()
    }

    pub fn move_time(&self) -> f32 {
        self.snowman.move_time
    }

    pub fn sprite(&self) -> &Sprite {
        &self.snowman.sprite
    }

    pub fn is_subscribed(&self) -> bool {
        self.stomp_subscription.is_some()
    }
}

impl Drop for SnowmanController {
    fn drop(&mut self) {
        self.events.off_context(self.context);
    }
}

fn idle_on_enter(snowman: &mut Snowman, next: &mut Transition<SnowmanState>) {
    snowman.sprite.play(Animation::SnowmanIdle);

    let direction = if snowman.rng.random_bool(0.5) {
        Direction::Left
    } else {
        Direction::Right
    };
    next.to(SnowmanState::moving(direction));
}

fn start_walking(snowman: &mut Snowman, animation: Animation) {
    snowman.sprite.play(animation);
    snowman.move_time = 0.0;
}

fn patrol(snowman: &mut Snowman, dt: f32, direction: Direction, next: &mut Transition<SnowmanState>) {
    snowman.move_time += dt;
    snowman.body.set_velocity_x(direction.sign() * SPEED);

    if snowman.move_time >= PATROL_DWELL_MS {
        next.to(SnowmanState::moving(direction.opposite()));
    }
}

fn move_left_on_enter(snowman: &mut Snowman, _next: &mut Transition<SnowmanState>) {
    start_walking(snowman, Animation::SnowmanMoveLeft);
}

fn move_left_on_update(snowman: &mut Snowman, dt: f32, next: &mut Transition<SnowmanState>) {
    patrol(snowman, dt, Direction::Left, next);
}

fn move_right_on_enter(snowman: &mut Snowman, _next: &mut Transition<SnowmanState>) {
    start_walking(snowman, Animation::SnowmanMoveRight);
}

fn move_right_on_update(snowman: &mut Snowman, dt: f32, next: &mut Transition<SnowmanState>) {
    patrol(snowman, dt, Direction::Right, next);
}

fn dead_on_enter(snowman: &mut Snowman, _next: &mut Transition<SnowmanState>) {
    snowman.body.set_velocity_x(0.0);
    snowman.sprite.stop();
    snowman.sprite.shrink(SHRINK_MS);
}
