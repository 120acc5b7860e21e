//! Presentation cues recorded by gameplay code for a renderer to pick up.
//!
//! Nothing here draws. Controllers note which animation should play, whether the sprite is flipped,
//! and the timing of the hit flash and defeat shrink, which the level needs to know when to remove a
//! defeated snowman.

use strum_macros::{Display, IntoStaticStr};

use crate::constants::presentation::{FLASH_DURATION_MS, FLASH_REPEAT};

/// Animation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Animation {
    PlayerIdle,
    PlayerWalk,
    PlayerJump,
    PlayerDeath,
    SnowmanIdle,
    SnowmanMoveLeft,
    SnowmanMoveRight,
}

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint(pub u32);

impl Tint {
    pub const WHITE: Tint = Tint(0xffffff);
    pub const RED: Tint = Tint(0xff0000);
    pub const BLUE: Tint = Tint(0x0000ff);

    fn channels(self) -> [f32; 3] {
        [(self.0 >> 16) & 0xff, (self.0 >> 8) & 0xff, self.0 & 0xff].map(|c| c as f32)
    }

    /// Linear interpolation between two colours, `t` in `[0, 1]`.
    pub fn lerp(self, to: Tint, t: f32) -> Tint {
        let t = t.clamp(0.0, 1.0);
        let [r, g, b]: [u32; 3] = std::array::from_fn(|i| {
            let (from, to) = (self.channels()[i], to.channels()[i]);
            (from + (to - from) * t).round() as u32
        });
        Tint((r << 16) | (g << 8) | b)
    }
}

/// A yoyo colour flash: `from` to `to` and back, repeated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub from: Tint,
    pub to: Tint,
    /// Duration of one leg.
    pub duration_ms: f32,
    pub repeat: u32,
    elapsed_ms: f32,
}

impl Flash {
    pub fn new(from: Tint, to: Tint) -> Self {
        Self {
            from,
            to,
            duration_ms: FLASH_DURATION_MS,
            repeat: FLASH_REPEAT,
            elapsed_ms: 0.0,
        }
    }

    /// Total running time: every run goes there and back.
    pub fn total_ms(&self) -> f32 {
        self.duration_ms * 2.0 * (self.repeat + 1) as f32
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt).min(self.total_ms());
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.total_ms()
    }

    pub fn color(&self) -> Tint {
        if self.is_finished() {
            return self.from;
        }
        let leg = self.elapsed_ms / self.duration_ms;
        let within = leg.fract();
        // Even legs go toward `to`, odd legs come back
        let t = if (leg as u32) % 2 == 0 { within } else { 1.0 - within };
        self.from.lerp(self.to, t)
    }
}

/// Vertical collapse played when a snowman is defeated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shrink {
    pub duration_ms: f32,
    elapsed_ms: f32,
}

impl Shrink {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt).min(self.duration_ms);
    }

    /// Remaining display height as a fraction of the original.
    pub fn scale(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        1.0 - self.elapsed_ms / self.duration_ms
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// What a renderer needs to know about an entity's sprite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprite {
    pub animation: Option<Animation>,
    pub playing: bool,
    pub flip_x: bool,
    pub flash: Option<Flash>,
    pub shrink: Option<Shrink>,
}

impl Sprite {
    pub fn play(&mut self, animation: Animation) {
        self.animation = Some(animation);
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn flash(&mut self, from: Tint, to: Tint) {
        self.flash = Some(Flash::new(from, to));
    }

    pub fn shrink(&mut self, duration_ms: f32) {
        self.shrink = Some(Shrink::new(duration_ms));
    }

    /// Current tint, white when no flash is running.
    pub fn tint(&self) -> Tint {
        self.flash.map(|flash| flash.color()).unwrap_or(Tint::WHITE)
    }

    /// Advances running flash and shrink cues.
    pub fn update(&mut self, dt: f32) {
        if let Some(flash) = &mut self.flash {
            flash.advance(dt);
            if flash.is_finished() {
                self.flash = None;
            }
        }
        if let Some(shrink) = &mut self.shrink {
            shrink.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_runs_there_and_back_three_times() {
        let mut flash = Flash::new(Tint::WHITE, Tint::RED);
        assert_eq!(flash.total_ms(), 600.0);
        assert_eq!(flash.color(), Tint::WHITE);

        flash.advance(100.0);
        assert_eq!(flash.color(), Tint::RED);
        flash.advance(50.0);
        assert_eq!(flash.color(), Tint::WHITE.lerp(Tint::RED, 0.5));

        flash.advance(500.0);
        assert!(flash.is_finished());
        assert_eq!(flash.color(), Tint::WHITE);
    }

    #[test]
    fn sprite_drops_finished_flash() {
        let mut sprite = Sprite::default();
        sprite.flash(Tint::WHITE, Tint::BLUE);
        sprite.update(50.0);
        assert_ne!(sprite.tint(), Tint::WHITE);

        sprite.update(1000.0);
        assert_eq!(sprite.flash, None);
        assert_eq!(sprite.tint(), Tint::WHITE);
    }

    #[test]
    fn shrink_scales_down_to_nothing() {
        let mut shrink = Shrink::new(200.0);
        shrink.advance(50.0);
        assert_eq!(shrink.scale(), 0.75);
        shrink.advance(500.0);
        assert!(shrink.is_finished());
        assert_eq!(shrink.scale(), 0.0);
    }
}
