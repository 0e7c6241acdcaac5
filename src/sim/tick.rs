//! Per-tick update rules
//!
//! Rules never touch the object list directly. They read this tick's hits,
//! drive their own body, adjust the score and record intents; the scene
//! applies the intents once every rule has run.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::object::{
    GameObject, Hit, ObjectId, ObjectKind, ObjectTag, Spawn, hit_by_any, random_velocity,
};
use super::state::Player;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::input::InputState;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Spawn, removal and sound requests collected during the update phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intents {
    pub spawns: Vec<Spawn>,
    pub removals: Vec<ObjectId>,
    pub sounds: Vec<SoundEffect>,
}

impl Intents {
    pub fn spawn(&mut self, spawn: Spawn) {
        self.spawns.push(spawn);
    }

    pub fn remove(&mut self, id: ObjectId) {
        self.removals.push(id);
    }

    pub fn play(&mut self, sound: SoundEffect) {
        self.sounds.push(sound);
    }
}

/// Everything a rule may read or change besides its own object
pub struct TickContext<'a> {
    /// Frame clock (milliseconds in the browser)
    pub time: f64,
    pub player: &'a mut Player,
    pub input: &'a mut InputState,
    pub rng: &'a mut Pcg32,
    pub intents: Intents,
}

impl GameObject {
    /// Run this object's rule for one tick
    pub(crate) fn update(&mut self, physics: &mut PhysicsWorld, ctx: &mut TickContext<'_>) {
        match &mut self.kind {
            ObjectKind::Wall => {}
            ObjectKind::Explosion { created_at } => match *created_at {
                None => *created_at = Some(ctx.time),
                Some(t) if t + EXPLOSION_LIFETIME < ctx.time => ctx.intents.remove(self.id),
                Some(_) => {}
            },
            ObjectKind::Bullet => {
                if !self.hit_by.is_empty() {
                    let position = physics.position(self.body);
                    ctx.intents.spawn(Spawn::Explosion { position });
                    ctx.intents.remove(self.id);
                }
            }
            ObjectKind::Asteroid { scale } => {
                update_asteroid(self.id, self.body, *scale, &self.hit_by, physics, ctx);
            }
            ObjectKind::Ship { last_shot } => {
                update_ship(self.body, last_shot, &self.hit_by, physics, ctx);
            }
        }
    }
}

/// Split or vanish when shot. Several bullets in one tick count as one.
fn update_asteroid(
    id: ObjectId,
    body: BodyHandle,
    scale: f32,
    hits: &[Hit],
    physics: &PhysicsWorld,
    ctx: &mut TickContext<'_>,
) {
    if !hit_by_any(hits, ObjectTag::Bullet) {
        return;
    }

    let position = physics.position(body);
    if scale >= ASTEROID_SPLIT_SCALE {
        let velocity = random_velocity(ctx.rng);
        for velocity in [velocity, -velocity] {
            ctx.intents.spawn(Spawn::Asteroid {
                scale: scale / 2.0,
                position,
                velocity,
            });
        }
        ctx.player.award(ASTEROID_SPLIT_REWARD);
        ctx.intents.play(SoundEffect::AsteroidExplosion);
    } else {
        ctx.player.award(ASTEROID_DESTROY_REWARD);
        ctx.intents.play(SoundEffect::AsteroidLastExplosion);
    }
    ctx.intents.remove(id);
}

/// Thrust, steer, fire and take asteroid hits. The ship is never removed.
fn update_ship(
    body: BodyHandle,
    last_shot: &mut f64,
    hits: &[Hit],
    physics: &mut PhysicsWorld,
    ctx: &mut TickContext<'_>,
) {
    let input = &mut *ctx.input;

    let thrust = physics.world_vector(body, Vec2::new(0.0, input.throttle * SHIP_THRUST));
    physics.apply_force(body, thrust);

    // A pending drag angle overrides torque steering for this tick
    match input.angle.take() {
        Some(delta) => {
            let angle = physics.angle(body);
            physics.set_angle(body, angle + delta);
        }
        None => physics.apply_torque(body, f32::from(input.steering) * SHIP_TORQUE),
    }

    // A clock that jumped backwards fires regardless of the trigger
    let cooled_down = *last_shot + SHOT_COOLDOWN <= ctx.time;
    if (input.trigger && cooled_down) || *last_shot > ctx.time {
        let position = physics.world_point(body, Vec2::Y);
        let muzzle = physics.world_vector(body, Vec2::new(0.0, MUZZLE_SPEED));
        ctx.intents.spawn(Spawn::Bullet {
            position,
            angle: physics.angle(body),
            velocity: physics.velocity(body) + muzzle,
        });
        ctx.player.charge(SHOT_COST);
        ctx.intents.play(SoundEffect::Shot);
        *last_shot = ctx.time;
    }

    if hit_by_any(hits, ObjectTag::Asteroid) {
        ctx.player.charge(SHIP_HIT_PENALTY);
        ctx.intents.play(SoundEffect::ShipExplosion);
    }
}
