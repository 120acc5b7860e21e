//! Snowfall: the gameplay kernel of a 2D platformer.
//!
//! Entities are driven by [`state_machine::StateMachine`]s; collisions reported by the physics
//! world are classified by [`obstacles`] and body payloads, then turned into state transitions
//! and [`events`] that the HUD and other entities react to.

pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod hud;
pub mod input;
pub mod level;
pub mod logging;
pub mod obstacles;
pub mod physics;
pub mod presentation;
pub mod state_machine;
