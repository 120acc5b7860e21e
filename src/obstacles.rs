use std::collections::HashMap;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::trace;

use crate::error::ObstacleError;
use crate::physics::BodyId;

/// Semantic category of a collision partner, independent of how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Obstacle {
    Spikes,
    Snowman,
    Goal,
}

/// Registry mapping physics bodies to their obstacle category.
///
/// Populated while a level is assembled and only queried afterwards. A body belongs to at most one
/// category.
#[derive(Debug, Default)]
pub struct ObstaclesController {
    tags: HashMap<BodyId, Obstacle>,
}

impl ObstaclesController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags `body` with `category`.
    ///
    /// Adding the same pair twice is harmless; re-tagging a body under another category is refused.
    pub fn add(&mut self, category: Obstacle, body: BodyId) -> Result<(), ObstacleError> {
        match self.tags.get(&body) {
            Some(&existing) if existing != category => Err(ObstacleError::AlreadyTagged {
                body,
                existing,
                requested: category,
            }),
            Some(_) => Ok(()),
            None => {
                trace!(%body, %category, "Registered obstacle");
                self.tags.insert(body, category);
                Ok(())
            }
        }
    }

    /// Whether `body` is registered under `category`. Unregistered bodies are simply `false`.
    pub fn is(&self, category: Obstacle, body: BodyId) -> bool {
        self.tags.get(&body) == Some(&category)
    }

    pub fn category_of(&self, body: BodyId) -> Option<Obstacle> {
        self.tags.get(&body).copied()
    }

    /// All bodies registered under `category`, in no particular order.
    pub fn bodies(&self, category: Obstacle) -> impl Iterator<Item = BodyId> + '_ {
        self.tags
            .iter()
            .filter(move |&(_, &tag)| tag == category)
            .map(|(&body, _)| body)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
