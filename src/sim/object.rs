//! Game object variants and their construction

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::physics::{BodyDesc, BodyHandle, BodyKind, CollisionGroup, PhysicsWorld, Shape};
use crate::render::Sprite;

/// Stable identifier of a game object, unique within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Variant discriminant, recorded in hits so rules can match on the
/// other party without looking it up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectTag {
    Wall,
    Explosion,
    Bullet,
    Asteroid,
    Ship,
}

/// Variant plus its gameplay state
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Elastic boundary, no state
    Wall,
    /// Visual only; `created_at` is set on the first update
    Explosion { created_at: Option<f64> },
    Bullet,
    /// Scale in (0, 1]
    Asteroid { scale: f32 },
    /// Frame-clock time of the last shot
    Ship { last_shot: f64 },
}

impl ObjectKind {
    pub fn tag(&self) -> ObjectTag {
        match self {
            ObjectKind::Wall => ObjectTag::Wall,
            ObjectKind::Explosion { .. } => ObjectTag::Explosion,
            ObjectKind::Bullet => ObjectTag::Bullet,
            ObjectKind::Asteroid { .. } => ObjectTag::Asteroid,
            ObjectKind::Ship { .. } => ObjectTag::Ship,
        }
    }
}

/// One collision recorded against an object this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub by: ObjectId,
    pub tag: ObjectTag,
}

/// Request to create an object, applied by [`Scene::add`](super::Scene::add)
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Wall {
        center: Vec2,
        width: f32,
        height: f32,
    },
    Explosion {
        position: Vec2,
    },
    Bullet {
        position: Vec2,
        angle: f32,
        velocity: Vec2,
    },
    Asteroid {
        scale: f32,
        position: Vec2,
        velocity: Vec2,
    },
    /// The player's ship, at the origin facing up
    Ship,
}

/// Resolved construction parameters for a spawn
struct Blueprint {
    kind: ObjectKind,
    body: BodyDesc,
    width: f32,
    height: f32,
    sprite: Option<Sprite>,
}

impl Spawn {
    pub fn tag(&self) -> ObjectTag {
        match self {
            Spawn::Wall { .. } => ObjectTag::Wall,
            Spawn::Explosion { .. } => ObjectTag::Explosion,
            Spawn::Bullet { .. } => ObjectTag::Bullet,
            Spawn::Asteroid { .. } => ObjectTag::Asteroid,
            Spawn::Ship => ObjectTag::Ship,
        }
    }

    fn blueprint(self) -> Blueprint {
        match self {
            Spawn::Wall {
                center,
                width,
                height,
            } => Blueprint {
                kind: ObjectKind::Wall,
                body: BodyDesc::new(
                    BodyKind::Static,
                    Shape::Box {
                        half_width: width / 2.0,
                        half_height: height / 2.0,
                    },
                )
                .at(center)
                .restitution(1.0),
                width,
                height,
                sprite: None,
            },
            Spawn::Explosion { position } => Blueprint {
                kind: ObjectKind::Explosion { created_at: None },
                body: BodyDesc::new(
                    BodyKind::Static,
                    Shape::Circle {
                        radius: EXPLOSION_RADIUS,
                    },
                )
                .at(position)
                .disabled(),
                width: 2.0 * EXPLOSION_RADIUS,
                height: 2.0 * EXPLOSION_RADIUS,
                sprite: Some(Sprite::Explosion),
            },
            Spawn::Bullet {
                position,
                angle,
                velocity,
            } => Blueprint {
                kind: ObjectKind::Bullet,
                body: BodyDesc::new(
                    BodyKind::Dynamic,
                    Shape::Circle {
                        radius: BULLET_RADIUS,
                    },
                )
                .at(position)
                .angle(angle)
                .velocity(velocity)
                .group(CollisionGroup::Projectile),
                width: 2.0 * BULLET_RADIUS,
                height: 2.0 * BULLET_RADIUS,
                sprite: Some(Sprite::Bullet),
            },
            Spawn::Asteroid {
                scale,
                position,
                velocity,
            } => {
                let size = ASTEROID_SIZE * scale;
                Blueprint {
                    kind: ObjectKind::Asteroid { scale },
                    // Collider slightly inside the sprite outline
                    body: BodyDesc::new(
                        BodyKind::Dynamic,
                        Shape::Circle {
                            radius: 0.9 * size / 2.0,
                        },
                    )
                    .at(position)
                    .velocity(velocity)
                    .restitution(1.0),
                    width: size,
                    height: size,
                    sprite: Some(Sprite::Asteroid),
                }
            }
            Spawn::Ship => Blueprint {
                kind: ObjectKind::Ship { last_shot: 0.0 },
                body: BodyDesc::new(
                    BodyKind::Dynamic,
                    Shape::Box {
                        half_width: SHIP_WIDTH / 2.0,
                        half_height: SHIP_HEIGHT / 2.0,
                    },
                )
                .restitution(1.0)
                .damping(SHIP_LINEAR_DAMPING, SHIP_ANGULAR_DAMPING)
                .group(CollisionGroup::Projectile),
                width: SHIP_WIDTH,
                height: SHIP_HEIGHT,
                sprite: Some(Sprite::Ship),
            },
        }
    }
}

/// A live object: one physics body plus gameplay state
#[derive(Debug, Clone)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub body: BodyHandle,
    pub width: f32,
    pub height: f32,
    pub sprite: Option<Sprite>,
    pub(crate) hit_by: Vec<Hit>,
    pub(crate) deleted: bool,
}

impl GameObject {
    /// Create the backing body and wrap it
    pub(crate) fn build(id: ObjectId, spawn: Spawn, physics: &mut PhysicsWorld) -> Self {
        let blueprint = spawn.blueprint();
        let body = physics.create_body(&blueprint.body, id);
        Self {
            id,
            kind: blueprint.kind,
            body,
            width: blueprint.width,
            height: blueprint.height,
            sprite: blueprint.sprite,
            hit_by: Vec::new(),
            deleted: false,
        }
    }

    pub fn tag(&self) -> ObjectTag {
        self.kind.tag()
    }

    /// Collisions recorded this tick (empty outside [`Scene::update`](super::Scene::update))
    pub fn hit_by(&self) -> &[Hit] {
        &self.hit_by
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// True if any hit came from an object of `tag`
pub(crate) fn hit_by_any(hits: &[Hit], tag: ObjectTag) -> bool {
    hits.iter().any(|hit| hit.tag == tag)
}

/// Uniform velocity within the asteroid speed bound on each axis
pub fn random_velocity(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(-ASTEROID_MAX_SPEED..ASTEROID_MAX_SPEED),
        rng.random_range(-ASTEROID_MAX_SPEED..ASTEROID_MAX_SPEED),
    )
}

/// Uniform position within the level spawn area
pub fn random_spawn_position(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(-ASTEROID_SPAWN_EXTENT..ASTEROID_SPAWN_EXTENT),
        rng.random_range(-ASTEROID_SPAWN_EXTENT..ASTEROID_SPAWN_EXTENT),
    )
}
