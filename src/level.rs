//! Level assembly from spawn markers.
//!
//! A level is described by a flat list of [`SpawnMarker`]s, the way an editor object layer would
//! describe it. [`Level::build`] turns those into physics bodies, obstacle tags and controllers.

use std::rc::Rc;
use std::str::FromStr;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum_macros::{Display, EnumString, IntoStaticStr};
use tracing::{debug, info};

use crate::constants::{health, player, snowman, PICKUP_SIZE};
use crate::entity::player::PlayerController;
use crate::entity::snowman::{SharedSnowman, SnowmanController};
use crate::entity::SharedPhysics;
use crate::error::{GameResult, LevelError};
use crate::events::SharedEvents;
use crate::input::InputState;
use crate::obstacles::{Obstacle, ObstaclesController};
use crate::physics::{BodyData, BodyDesc, BodyId};

/// The kind of object a marker spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum MarkerKind {
    PenguinSpawn,
    StarSpawn,
    Spikes,
    Health,
    Snowman,
    Goal,
    Ground,
}

/// One object of the level layout. `position` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnMarker {
    pub kind: MarkerKind,
    pub position: Vec2,
    pub size: Vec2,
}

impl SpawnMarker {
    pub const fn new(kind: MarkerKind, position: Vec2, size: Vec2) -> Self {
        Self { kind, position, size }
    }

    /// Creates a marker from its layout name.
    pub fn parse(name: &str, position: Vec2, size: Vec2) -> Result<Self, LevelError> {
        let kind = MarkerKind::from_str(name).map_err(|_| LevelError::UnknownMarker(name.to_string()))?;
        Ok(Self::new(kind, position, size))
    }

    fn centre(&self, size: Vec2) -> Vec2 {
        self.position + size * 0.5
    }
}

const fn marker(kind: MarkerKind, x: f32, y: f32, width: f32, height: f32) -> SpawnMarker {
    SpawnMarker::new(kind, Vec2::new(x, y), Vec2::new(width, height))
}

/// The built-in level used by the headless demo.
pub const DEMO_LEVEL: &[SpawnMarker] = &[
    marker(MarkerKind::Ground, 0.0, 400.0, 1600.0, 40.0),
    marker(MarkerKind::PenguinSpawn, 40.0, 360.0, 28.0, 40.0),
    marker(MarkerKind::StarSpawn, 180.0, 370.0, 24.0, 24.0),
    marker(MarkerKind::Spikes, 300.0, 384.0, 48.0, 16.0),
    marker(MarkerKind::Health, 420.0, 370.0, 24.0, 24.0),
    marker(MarkerKind::StarSpawn, 520.0, 300.0, 24.0, 24.0),
    marker(MarkerKind::Snowman, 700.0, 344.0, 40.0, 56.0),
    marker(MarkerKind::StarSpawn, 900.0, 370.0, 24.0, 24.0),
    marker(MarkerKind::Snowman, 1100.0, 344.0, 40.0, 56.0),
    marker(MarkerKind::Goal, 1500.0, 300.0, 40.0, 100.0),
];

/// A running level: its bodies, obstacle tags and entity controllers.
#[derive(Debug)]
pub struct Level {
    physics: SharedPhysics,
    obstacles: ObstaclesController,
    player: PlayerController,
    snowmen: Vec<SharedSnowman>,
}

impl Level {
    /// Spawns every marker into `physics`. Exactly one player spawn is required.
    pub fn build(
        markers: &[SpawnMarker],
        physics: SharedPhysics,
        events: SharedEvents,
        rng: &mut SmallRng,
    ) -> GameResult<Self> {
        let spawns: Vec<&SpawnMarker> = markers
            .iter()
            .filter(|marker| marker.kind == MarkerKind::PenguinSpawn)
            .collect();
        let spawn = match spawns.as_slice() {
            [] => return Err(LevelError::MissingPlayerSpawn.into()),
            [spawn] => *spawn,
            _ => return Err(LevelError::DuplicatePlayerSpawn(spawns.len()).into()),
        };

        let mut obstacles = ObstaclesController::new();
        let mut snowman_bodies = Vec::new();

        let player_body = physics
            .borrow_mut()
            .add_body(BodyDesc::dynamic(spawn.centre(player::SIZE), player::SIZE).with_fixed_rotation());

        for marker in markers {
            let body = match marker.kind {
                MarkerKind::PenguinSpawn => continue,
                MarkerKind::StarSpawn => {
                    BodyDesc::sensor(marker.centre(PICKUP_SIZE), PICKUP_SIZE).with_data(BodyData::Star)
                }
                MarkerKind::Health => BodyDesc::sensor(marker.centre(PICKUP_SIZE), PICKUP_SIZE).with_data(
                    BodyData::Health {
                        points: health::PICKUP_BONUS,
                    },
                ),
                MarkerKind::Spikes => BodyDesc::solid(marker.centre(marker.size), marker.size),
                MarkerKind::Snowman => {
                    BodyDesc::dynamic(marker.centre(snowman::SIZE), snowman::SIZE).with_fixed_rotation()
                }
                MarkerKind::Goal => BodyDesc::sensor(marker.centre(marker.size), marker.size),
                MarkerKind::Ground => {
                    BodyDesc::solid(marker.centre(marker.size), marker.size).with_data(BodyData::Terrain)
                }
            };
            let id = physics.borrow_mut().add_body(body);

            match marker.kind {
                MarkerKind::Spikes => obstacles.add(Obstacle::Spikes, id)?,
                MarkerKind::Goal => obstacles.add(Obstacle::Goal, id)?,
                MarkerKind::Snowman => {
                    obstacles.add(Obstacle::Snowman, id)?;
                    snowman_bodies.push(id);
                }
                _ => {}
            }
        }

        let player = PlayerController::new(player_body, Rc::clone(&physics), Rc::clone(&events))?;
        let snowmen = snowman_bodies
            .into_iter()
            .map(|body| {
                SnowmanController::spawn(
                    body,
                    Rc::clone(&physics),
                    Rc::clone(&events),
                    SmallRng::from_rng(&mut *rng),
                )
            })
            .collect::<GameResult<Vec<_>>>()?;

        info!(
            bodies = physics.borrow().len(),
            obstacles = obstacles.len(),
            snowmen = snowmen.len(),
            "Level built"
        );

        Ok(Self {
            physics,
            obstacles,
            player,
            snowmen,
        })
    }

    /// Runs one frame: physics, contact dispatch, entity updates and snowman cleanup.
    pub fn advance(&mut self, input: InputState, dt: f32) -> GameResult<()> {
        let contacts = self.physics.borrow_mut().step(dt);

        let player_body = self.player.body();
        for contact in contacts {
            if let Some(partner) = contact.partner_of(player_body) {
                self.player.handle_collision(partner, &self.obstacles)?;
            }
        }

        self.player.update(input, dt)?;
        for snowman in &self.snowmen {
            snowman.borrow_mut().update(dt)?;
        }

        self.reap_snowmen();
        Ok(())
    }

    /// Drops snowmen whose defeat animation has finished, along with their bodies.
    fn reap_snowmen(&mut self) {
        let physics = &self.physics;
        self.snowmen.retain(|snowman| {
            let snowman = snowman.borrow();
            if !snowman.is_expired() {
                return true;
            }

            debug!(snowman = %snowman.body(), "Removing defeated snowman");
            physics.borrow_mut().remove_body(snowman.body());
            false
        });
    }

    pub fn physics(&self) -> &SharedPhysics {
        &self.physics
    }

    pub fn obstacles(&self) -> &ObstaclesController {
        &self.obstacles
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn snowmen(&self) -> &[SharedSnowman] {
        &self.snowmen
    }

    /// Finds the live snowman owning `body`.
    pub fn snowman(&self, body: BodyId) -> Option<&SharedSnowman> {
        self.snowmen.iter().find(|snowman| snowman.borrow().body() == body)
    }
}
