//! This module contains all the tuning constants used in the game.
//!
//! Times are in milliseconds. Velocities are in units per reference frame (see
//! [`physics::FRAME_TIME_MS`]); y grows downward, so negative vertical velocity moves up.

use glam::Vec2;

/// Player tuning.
pub mod player {
    use glam::Vec2;

    /// Horizontal speed while walking or steering a jump.
    pub const SPEED: f32 = 6.0;
    /// Upward impulse applied when a jump starts.
    pub const JUMP_VELOCITY: f32 = 16.0;
    /// Fraction of the jump impulse kept when the jump button is released while ascending.
    pub const JUMP_CUT_FACTOR: f32 = 0.2;
    /// Upward knockback after touching spikes.
    pub const SPIKE_KNOCKBACK: f32 = 8.0;
    /// Knockback after being hit by a snowman, away from it (or upward if it is gone).
    pub const SNOWMAN_KNOCKBACK: f32 = 20.0;
    /// Upward bounce after stomping a snowman.
    pub const STOMP_BOUNCE: f32 = 10.0;
    /// Health lost per hit.
    pub const DAMAGE: u8 = 50;
    /// Size of the player's body.
    pub const SIZE: Vec2 = Vec2::new(28.0, 40.0);
}

/// Health tuning.
pub mod health {
    pub const MAX: u8 = 100;
    /// Bonus granted by a health pickup.
    pub const PICKUP_BONUS: u8 = 50;
}

/// Snowman tuning.
pub mod snowman {
    use glam::Vec2;

    pub const SPEED: f32 = 5.0;
    /// Time spent walking in one direction before turning around.
    pub const PATROL_DWELL_MS: f32 = 2000.0;
    /// Duration of the shrink played when a snowman is defeated.
    pub const SHRINK_MS: f32 = 200.0;
    pub const SIZE: Vec2 = Vec2::new(40.0, 56.0);
}

/// Presentation cue tuning.
pub mod presentation {
    /// Duration of one leg of the hit flash.
    pub const FLASH_DURATION_MS: f32 = 100.0;
    /// Number of times the hit flash repeats after its first run.
    pub const FLASH_REPEAT: u32 = 2;
}

/// HUD tuning.
pub mod hud {
    /// Time the health bar takes to animate toward a new value.
    pub const HEALTH_TWEEN_MS: f32 = 200.0;
    /// Width of a full health bar, in pixels.
    pub const BAR_WIDTH: f32 = 200.0;
}

/// Physics stand-in tuning.
pub mod physics {
    /// Length of the reference frame velocities are expressed in.
    pub const FRAME_TIME_MS: f32 = 1000.0 / 60.0;
    /// Downward acceleration, per reference frame.
    pub const GRAVITY: f32 = 1.0;
    /// Bodies closer than this are considered touching.
    pub const CONTACT_SKIN: f32 = 0.5;
    /// Fraction of horizontal velocity lost per reference frame while resting on a solid.
    pub const GROUND_FRICTION: f32 = 0.1;
}

/// Headless demo tuning.
pub mod demo {
    /// Number of frames the demo runs for.
    pub const FRAMES: u64 = 60 * 20;
    /// Environment variable holding an optional RNG seed.
    pub const SEED_VAR: &str = "SNOWFALL_SEED";
}

/// Size of star and health pickups.
pub const PICKUP_SIZE: Vec2 = Vec2::new(24.0, 24.0);
