//! A minimal kinematic stand-in for the physics collaborator.
//!
//! It offers exactly what the gameplay code consumes: bodies with a position and a velocity,
//! independent velocity setters, a payload tagged onto a body at spawn time, and the list of
//! contacts that started during a step. Only axis-aligned boxes are supported; dynamic bodies are
//! pushed out of solid static bodies and otherwise pass through each other.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use glam::Vec2;
use tracing::trace;

use crate::constants::physics::{CONTACT_SKIN, FRAME_TIME_MS, GRAVITY, GROUND_FRICTION};
use crate::error::PhysicsError;

/// Opaque identity of a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved by its velocity and gravity, blocked by solid static bodies.
    Dynamic,
    /// Never moves, blocks dynamic bodies.
    Static,
    /// Never moves, only reports contacts.
    Sensor,
}

/// Payload attached to a spawned body and read back at collision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyData {
    /// Static level geometry.
    Terrain,
    Star,
    Health { points: u8 },
}

/// Everything needed to create a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec2,
    pub size: Vec2,
    pub kind: BodyKind,
    pub fixed_rotation: bool,
    pub data: Option<BodyData>,
}

impl BodyDesc {
    pub fn dynamic(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            kind: BodyKind::Dynamic,
            fixed_rotation: false,
            data: None,
        }
    }

    pub fn solid(position: Vec2, size: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            ..Self::dynamic(position, size)
        }
    }

    pub fn sensor(position: Vec2, size: Vec2) -> Self {
        Self {
            kind: BodyKind::Sensor,
            ..Self::dynamic(position, size)
        }
    }

    pub fn with_fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    pub fn with_data(mut self, data: BodyData) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    /// Centre of the body.
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub kind: BodyKind,
    pub fixed_rotation: bool,
    pub data: Option<BodyData>,
}

impl Body {
    fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Whether the two boxes overlap or lie within `skin` of each other.
    fn touches(&self, other: &Body, skin: f32) -> bool {
        let gap = (self.position - other.position).abs() - (self.half_extents() + other.half_extents());
        gap.x <= skin && gap.y <= skin
    }
}

/// A contact between two bodies that did not exist during the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionStart {
    pub body_a: BodyId,
    pub body_b: BodyId,
}

impl CollisionStart {
    /// If `body` is part of this contact, returns the other body.
    pub fn partner_of(&self, body: BodyId) -> Option<BodyId> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// The body arena.
#[derive(Debug)]
pub struct PhysicsWorld {
    bodies: BTreeMap<BodyId, Body>,
    contacts: HashSet<(BodyId, BodyId)>,
    next_id: u32,
    gravity: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(GRAVITY)
    }
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self {
            bodies: BTreeMap::new(),
            contacts: HashSet::new(),
            next_id: 0,
            gravity,
        }
    }

    pub fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        self.bodies.insert(
            id,
            Body {
                id,
                position: desc.position,
                velocity: Vec2::ZERO,
                size: desc.size,
                kind: desc.kind,
                fixed_rotation: desc.fixed_rotation,
                data: desc.data,
            },
        );

        trace!(body = %id, kind = ?desc.kind, position = ?desc.position, "Added body");
        id
    }

    /// Removes a body and forgets its contacts.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let removed = self.bodies.remove(&id)?;
        self.contacts.retain(|&(a, b)| a != id && b != id);
        trace!(body = %id, "Removed body");
        Some(removed)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|body| body.position)
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|body| body.velocity)
    }

    pub fn data(&self, id: BodyId) -> Option<BodyData> {
        self.bodies.get(&id).and_then(|body| body.data)
    }

    pub fn set_velocity_x(&mut self, id: BodyId, x: f32) -> Result<(), PhysicsError> {
        self.body_mut(id)?.velocity.x = x;
        Ok(())
    }

    pub fn set_velocity_y(&mut self, id: BodyId, y: f32) -> Result<(), PhysicsError> {
        self.body_mut(id)?.velocity.y = y;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advances the simulation by `dt` milliseconds and returns the contacts that started.
    pub fn step(&mut self, dt: f32) -> Vec<CollisionStart> {
        let frames = dt / FRAME_TIME_MS;
        let solids: Vec<Body> = self
            .bodies
            .values()
            .filter(|body| body.kind == BodyKind::Static)
            .cloned()
            .collect();

        for body in self.bodies.values_mut().filter(|body| body.kind == BodyKind::Dynamic) {
            body.velocity.y += self.gravity * frames;
            body.position += body.velocity * frames;

            let mut grounded = false;
            for solid in &solids {
                grounded |= resolve_penetration(body, solid);
            }

            if grounded {
                body.velocity.x *= (1.0 - GROUND_FRICTION).powf(frames);
            }
        }

        let mut current = HashSet::new();
        let mut started = Vec::new();
        let bodies: Vec<&Body> = self.bodies.values().collect();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                // Static geometry never needs to know about other static geometry
                if a.kind != BodyKind::Dynamic && b.kind != BodyKind::Dynamic {
                    continue;
                }
                if !a.touches(b, CONTACT_SKIN) {
                    continue;
                }

                let pair = (a.id, b.id);
                if !self.contacts.contains(&pair) {
                    started.push(CollisionStart {
                        body_a: a.id,
                        body_b: b.id,
                    });
                }
                current.insert(pair);
            }
        }

        self.contacts = current;
        started
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, PhysicsError> {
        self.bodies.get_mut(&id).ok_or(PhysicsError::UnknownBody(id))
    }
}

/// Pushes `body` out of `solid` along the axis of least penetration and cancels its velocity there.
///
/// Returns true when `body` ended up standing on top of `solid`.
fn resolve_penetration(body: &mut Body, solid: &Body) -> bool {
    let delta = body.position - solid.position;
    let overlap = (body.half_extents() + solid.half_extents()) - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return false;
    }

    if overlap.y <= overlap.x {
        let direction = if delta.y < 0.0 { -1.0 } else { 1.0 };
        body.position.y += overlap.y * direction;
        if body.velocity.y * direction < 0.0 {
            body.velocity.y = 0.0;
        }
        direction < 0.0
    } else {
        let direction = if delta.x < 0.0 { -1.0 } else { 1.0 };
        body.position.x += overlap.x * direction;
        if body.velocity.x * direction < 0.0 {
            body.velocity.x = 0.0;
        }
        false
    }
}
