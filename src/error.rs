//! Centralized error types for the game.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use crate::obstacles::Obstacle;
use crate::physics::BodyId;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur while building or running a level.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    #[error("Obstacle error: {0}")]
    Obstacle(#[from] ObstacleError),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),
}

/// Errors raised by a [`StateMachine`](crate::state_machine::StateMachine).
///
/// All of these are programming errors in a transition table and are never silently ignored.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("[{machine}] state '{state}' is already registered")]
    DuplicateState { machine: &'static str, state: &'static str },

    #[error("[{machine}] state '{state}' was never registered")]
    UnknownState { machine: &'static str, state: String },

    #[error("[{machine}] no state has been entered yet")]
    NotStarted { machine: &'static str },

    #[error("[{machine}] terminal state '{state}' cannot transition to '{target}'")]
    TerminalState {
        machine: &'static str,
        state: &'static str,
        target: &'static str,
    },

    #[error("[{machine}] more than {limit} chained transitions, last target '{target}'")]
    TransitionLoop {
        machine: &'static str,
        target: &'static str,
        limit: usize,
    },
}

/// Errors related to the obstacle registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ObstacleError {
    #[error("Body {body} is already tagged as '{existing}', refusing to re-tag it as '{requested}'")]
    AlreadyTagged {
        body: BodyId,
        existing: Obstacle,
        requested: Obstacle,
    },
}

/// Errors reported by event subscribers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Subscriber failed: {0}")]
    Subscriber(String),

    #[error("Subscriber state is already borrowed")]
    Busy,
}

/// Errors raised while assembling a level from spawn markers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("Level has no player spawn marker")]
    MissingPlayerSpawn,

    #[error("Level has {0} player spawn markers, expected exactly one")]
    DuplicatePlayerSpawn(usize),

    #[error("Unknown spawn marker: {0}")]
    UnknownMarker(String),
}

/// Errors related to physics bodies.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("Body not found: {0}")]
    UnknownBody(BodyId),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
