//! The player-controlled penguin.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::constants::player::{
    DAMAGE, JUMP_CUT_FACTOR, JUMP_VELOCITY, SNOWMAN_KNOCKBACK, SPEED, SPIKE_KNOCKBACK, STOMP_BOUNCE,
};
use crate::constants::health;
use crate::entity::{BodyHandle, Direction, EnemyId, SharedPhysics};
use crate::error::GameResult;
use crate::events::{GameEvent, SharedEvents};
use crate::input::{Buttons, InputState};
use crate::obstacles::{Obstacle, ObstaclesController};
use crate::physics::{BodyData, BodyId};
use crate::presentation::{Animation, Sprite, Tint};
use crate::state_machine::{StateHooks, StateMachine, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum PlayerState {
    Idle,
    Walk,
    Jump,
    SpikeHit,
    SnowmanHit,
    SnowmanStomp,
    Dead,
}

/// Player health, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Health(u8);

impl Health {
    pub const MAX: Health = Health(health::MAX);
    pub const ZERO: Health = Health(0);

    /// Creates a health value, clamping anything above the maximum.
    pub fn new(value: u8) -> Self {
        Self(value.min(health::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn damaged(self, amount: u8) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    pub fn healed(self, amount: u8) -> Self {
        Self::new(self.0.saturating_add(amount))
    }

    pub fn is_depleted(self) -> bool {
        self.0 == 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::MAX
    }
}

/// Data the player's state hooks operate on.
#[derive(Debug)]
pub struct Player {
    body: BodyHandle,
    events: SharedEvents,
    health: Health,
    input: InputState,
    jump_released: bool,
    last_snowman: Option<EnemyId>,
    reached_goal: bool,
    sprite: Sprite,
}

/// Drives the player: input-driven state machine plus the collision classification policy.
#[derive(Debug)]
pub struct PlayerController {
    machine: StateMachine<PlayerState, Player>,
    player: Player,
}

impl PlayerController {
    pub fn new(body: BodyId, physics: SharedPhysics, events: SharedEvents) -> GameResult<Self> {
        Self::with_health(body, physics, events, Health::MAX)
    }

    pub fn with_health(body: BodyId, physics: SharedPhysics, events: SharedEvents, health: Health) -> GameResult<Self> {
        let mut machine = StateMachine::new("player");
        machine
            .add_state(
                PlayerState::Idle,
                StateHooks::new().with_enter(idle_on_enter).with_update(idle_on_update),
            )?
            .add_state(
                PlayerState::Walk,
                StateHooks::new()
                    .with_enter(walk_on_enter)
                    .with_update(walk_on_update)
                    .with_exit(walk_on_exit),
            )?
            .add_state(
                PlayerState::Jump,
                StateHooks::new().with_enter(jump_on_enter).with_update(jump_on_update),
            )?
            .add_state(PlayerState::SpikeHit, StateHooks::new().with_enter(spike_hit_on_enter))?
            .add_state(PlayerState::SnowmanHit, StateHooks::new().with_enter(snowman_hit_on_enter))?
            .add_state(PlayerState::SnowmanStomp, StateHooks::new().with_enter(snowman_stomp_on_enter))?
            .add_state(PlayerState::Dead, StateHooks::terminal().with_enter(dead_on_enter))?;

        let mut player = Player {
            body: BodyHandle::new(body, physics),
            events,
            health,
            input: InputState::default(),
            jump_released: false,
            last_snowman: None,
            reached_goal: false,
            sprite: Sprite::default(),
        };
        machine.set_state(&mut player, PlayerState::Idle)?;

        Ok(Self { machine, player })
    }

    /// Runs one frame of the state machine with this frame's input.
    pub fn update(&mut self, input: InputState, dt: f32) -> GameResult<()> {
        self.player.input = input;
        self.player.sprite.update(dt);
        self.machine.update(&mut self.player, dt)?;
        Ok(())
    }

    /// Reacts to a new contact between the player's body and `partner`.
    pub fn handle_collision(&mut self, partner: BodyId, obstacles: &ObstaclesController) -> GameResult<()> {
        if self.is_dead() {
            return Ok(());
        }

        match obstacles.category_of(partner) {
            Some(Obstacle::Spikes) => return self.force(PlayerState::SpikeHit),
            Some(Obstacle::Snowman) => {
                self.player.last_snowman = Some(partner);
                let (own, enemy) = {
                    let physics = self.player.body.physics().borrow();
                    (physics.position(self.player.body.id()), physics.position(partner))
                };

                // Screen coordinates: a smaller y is higher up
                let stomp = matches!((own, enemy), (Some(own), Some(enemy)) if own.y < enemy.y);
                debug!(snowman = %partner, stomp, "Player touched a snowman");
                return self.force(if stomp {
                    PlayerState::SnowmanStomp
                } else {
                    PlayerState::SnowmanHit
                });
            }
            Some(Obstacle::Goal) => {
                if !self.player.reached_goal {
                    self.player.reached_goal = true;
                    info!("Player reached the goal");
                    self.player.events.emit(GameEvent::GameWin);
                }
                return Ok(());
            }
            None => {}
        }

        let data = self.player.body.physics().borrow().data(partner);
        match data {
            Some(BodyData::Terrain) => {
                if self.machine.is_current_state(PlayerState::Jump) {
                    self.force(PlayerState::Idle)?;
                }
            }
            Some(BodyData::Star) => {
                debug!(star = %partner, "Star collected");
                self.player.events.emit(GameEvent::StarCollected);
                self.player.body.physics().borrow_mut().remove_body(partner);
            }
            Some(BodyData::Health { points }) => {
                self.player.health = self.player.health.healed(points);
                debug!(points, health = self.player.health.value(), "Health pack collected");
                self.player
                    .events
                    .emit(GameEvent::HealthChanged(self.player.health.value()));
                self.player.body.physics().borrow_mut().remove_body(partner);
            }
            None => {}
        }

        Ok(())
    }

    pub fn state(&self) -> Option<PlayerState> {
        self.machine.current()
    }

    pub fn is_dead(&self) -> bool {
        self.machine.is_current_state(PlayerState::Dead)
    }

    pub fn health(&self) -> Health {
        self.player.health
    }

    pub fn body(&self) -> BodyId {
        self.player.body.id()
    }

    pub fn last_snowman(&self) -> Option<EnemyId> {
        self.player.last_snowman
    }

    pub fn reached_goal(&self) -> bool {
        self.player.reached_goal
    }

    pub fn sprite(&self) -> &Sprite {
        &self.player.sprite
    }

    fn force(&mut self, state: PlayerState) -> GameResult<()> {
        self.machine.set_state(&mut self.player, state)?;
        Ok(())
    }
}

/// Applies held horizontal input. Returns `false` when no direction is held.
fn steer(player: &mut Player) -> bool {
    match player.input.horizontal() {
        Some(direction) => {
            player.sprite.flip_x = direction == Direction::Left;
            player.body.set_velocity_x(direction.sign() * SPEED);
            true
        }
        None => false,
    }
}

/// Applies a hit: damage, health announcement and the flash. Returns whether the player died.
fn take_hit(player: &mut Player, flash: Tint) -> bool {
    player.health = player.health.damaged(DAMAGE);
    info!(health = player.health.value(), "Player hit");
    player.events.emit(GameEvent::HealthChanged(player.health.value()));
    player.sprite.flash(Tint::WHITE, flash);
    player.health.is_depleted()
}

fn idle_on_enter(player: &mut Player, _next: &mut Transition<PlayerState>) {
    player.sprite.play(Animation::PlayerIdle);
}

fn idle_on_update(player: &mut Player, _dt: f32, next: &mut Transition<PlayerState>) {
    if player.input.horizontal().is_some() {
        next.to(PlayerState::Walk);
    }

    if player.input.just_pressed(Buttons::JUMP) {
        next.to(PlayerState::Jump);
    }
}

fn walk_on_enter(player: &mut Player, _next: &mut Transition<PlayerState>) {
    player.sprite.play(Animation::PlayerWalk);
}

fn walk_on_update(player: &mut Player, _dt: f32, next: &mut Transition<PlayerState>) {
    if !steer(player) {
        player.body.set_velocity_x(0.0);
        next.to(PlayerState::Idle);
    }

    if player.input.just_pressed(Buttons::JUMP) {
        next.to(PlayerState::Jump);
    }
}

fn walk_on_exit(player: &mut Player) {
    player.sprite.stop();
}

fn jump_on_enter(player: &mut Player, _next: &mut Transition<PlayerState>) {
    player.jump_released = false;
    player.sprite.play(Animation::PlayerJump);
    player.body.set_velocity_y(-JUMP_VELOCITY);
}

fn jump_on_update(player: &mut Player, _dt: f32, _next: &mut Transition<PlayerState>) {
    steer(player);

    if !player.jump_released && player.input.is_up(Buttons::JUMP) {
        let ascending = player.body.velocity().is_some_and(|velocity| velocity.y < 0.0);
        if ascending {
            player.body.set_velocity_y(-(JUMP_VELOCITY * JUMP_CUT_FACTOR));
        }
        player.jump_released = true;
    }
}

fn spike_hit_on_enter(player: &mut Player, next: &mut Transition<PlayerState>) {
    player.body.set_velocity_y(-SPIKE_KNOCKBACK);

    if take_hit(player, Tint::RED) {
        next.to(PlayerState::Dead);
    } else {
        next.to(PlayerState::Idle);
    }
}

fn snowman_hit_on_enter(player: &mut Player, next: &mut Transition<PlayerState>) {
    let enemy = player
        .last_snowman
        .and_then(|snowman| player.body.physics().borrow().position(snowman));

    match (player.body.position(), enemy) {
        (Some(own), Some(enemy)) => {
            let away = if own.x < enemy.x {
                Direction::Left
            } else {
                Direction::Right
            };
            player.body.set_velocity_x(away.sign() * SNOWMAN_KNOCKBACK);
        }
        _ => player.body.set_velocity_y(-SNOWMAN_KNOCKBACK),
    }

    if take_hit(player, Tint::BLUE) {
        next.to(PlayerState::Dead);
    } else {
        next.to(PlayerState::Idle);
    }
}

fn snowman_stomp_on_enter(player: &mut Player, next: &mut Transition<PlayerState>) {
    player.body.set_velocity_y(-STOMP_BOUNCE);

    match player.last_snowman {
        Some(snowman) => {
            player.events.emit(GameEvent::SnowmanStomped(snowman));
        }
        None => warn!("Stomp without a snowman to defeat"),
    }

    next.to(PlayerState::Idle);
}

fn dead_on_enter(player: &mut Player, _next: &mut Transition<PlayerState>) {
    info!("Player died");
    player.body.set_velocity_x(0.0);
    player.sprite.play(Animation::PlayerDeath);
}
