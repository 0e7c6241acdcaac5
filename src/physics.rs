//! rapier2d world adapter
//!
//! [`PhysicsWorld`] owns the rapier sets and pipeline. Game code only sees
//! [`BodyHandle`]s, glam vectors and the contact pairs returned by
//! [`PhysicsWorld::step`]. Each collider carries its owning [`ObjectId`] in
//! `user_data`, so contacts map straight back to game objects.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::sim::ObjectId;

/// Handle to a body in the physics world
pub type BodyHandle = RigidBodyHandle;

/// How the solver treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves (walls, explosions)
    Static,
    /// Fully simulated
    Dynamic,
}

/// Collider shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

/// Collision filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionGroup {
    /// Collides with everything
    #[default]
    Default,
    /// Collides with everything except other projectiles
    Projectile,
}

impl CollisionGroup {
    fn interaction_groups(self) -> InteractionGroups {
        match self {
            CollisionGroup::Default => InteractionGroups::all(),
            CollisionGroup::Projectile => InteractionGroups::new(Group::GROUP_2, !Group::GROUP_2),
        }
    }
}

/// Everything needed to create a body and its single collider
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub group: CollisionGroup,
    /// Disabled bodies are kept in the world but never collide
    pub enabled: bool,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, shape: Shape) -> Self {
        Self {
            kind,
            shape,
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            density: 1.0,
            restitution: 0.0,
            friction: 0.2,
            linear_damping: 0.0,
            angular_damping: 0.0,
            group: CollisionGroup::Default,
            enabled: true,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn group(mut self, group: CollisionGroup) -> Self {
        self.group = group;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Two objects whose colliders started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: ObjectId,
    pub b: ObjectId,
}

/// Collider outline for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugShape {
    pub position: Vec2,
    pub angle: f32,
    pub shape: Shape,
    pub enabled: bool,
}

/// Manages the rapier2d simulation state
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new_zero_gravity()
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![gravity.x, gravity.y],
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Open space: no gravity
    pub fn new_zero_gravity() -> Self {
        Self::new(Vec2::ZERO)
    }

    /// Solver iterations per step (clamped to at least one)
    pub fn set_solver_iterations(&mut self, iterations: usize) {
        self.integration_params.num_solver_iterations =
            NonZeroUsize::new(iterations).unwrap_or(NonZeroUsize::MIN);
    }

    /// Create a body with one collider owned by `owner`
    pub fn create_body(&mut self, desc: &BodyDesc, owner: ObjectId) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let body = builder
            .translation(vector![desc.position.x, desc.position.y])
            .rotation(desc.angle)
            .linvel(vector![desc.velocity.x, desc.velocity.y])
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .enabled(desc.enabled)
            .build();
        let handle = self.rigid_body_set.insert(body);

        let shape = match desc.shape {
            Shape::Box {
                half_width,
                half_height,
            } => SharedShape::cuboid(half_width, half_height),
            Shape::Circle { radius } => SharedShape::ball(radius),
        };
        // Max combine keeps an elastic wall elastic against an inelastic bullet
        let collider = ColliderBuilder::new(shape)
            .density(desc.density)
            .restitution(desc.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(desc.friction)
            .collision_groups(desc.group.interaction_groups())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(u128::from(owner.to_raw()))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        handle
    }

    /// Remove a body and its collider. Unknown handles are ignored.
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn position(&self, handle: BodyHandle) -> Vec2 {
        self.rigid_body_set
            .get(handle)
            .map(|rb| {
                let t = rb.translation();
                Vec2::new(t.x, t.y)
            })
            .unwrap_or(Vec2::ZERO)
    }

    pub fn angle(&self, handle: BodyHandle) -> f32 {
        self.rigid_body_set
            .get(handle)
            .map(|rb| rb.rotation().angle())
            .unwrap_or(0.0)
    }

    pub fn set_angle(&mut self, handle: BodyHandle, angle: f32) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_rotation(Rotation::new(angle), true);
        }
    }

    pub fn velocity(&self, handle: BodyHandle) -> Vec2 {
        self.rigid_body_set
            .get(handle)
            .map(|rb| {
                let v = rb.linvel();
                Vec2::new(v.x, v.y)
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Rotate a body-local vector into world space
    pub fn world_vector(&self, handle: BodyHandle, local: Vec2) -> Vec2 {
        Vec2::from_angle(self.angle(handle)).rotate(local)
    }

    /// Transform a body-local point into world space
    pub fn world_point(&self, handle: BodyHandle, local: Vec2) -> Vec2 {
        self.position(handle) + self.world_vector(handle, local)
    }

    /// Accumulate a force at the center of mass until [`Self::clear_forces`]
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.add_force(vector![force.x, force.y], true);
        }
    }

    /// Accumulate a torque until [`Self::clear_forces`]
    pub fn apply_torque(&mut self, handle: BodyHandle, torque: f32) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.add_torque(torque, true);
        }
    }

    pub fn clear_forces(&mut self) {
        for (_, rb) in self.rigid_body_set.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }

    /// Advance the simulation by `dt`.
    ///
    /// Returns the contact pairs that started during the step, in the order
    /// rapier reported them. Pairs are not deduplicated.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.integration_params.dt = dt;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                if let (Some(a), Some(b)) = (self.owner(h1), self.owner(h2)) {
                    contacts.push(Contact { a, b });
                }
            }
        }
        contacts
    }

    fn owner(&self, collider: ColliderHandle) -> Option<ObjectId> {
        let data = self.collider_set.get(collider)?.user_data;
        u32::try_from(data).ok().map(ObjectId::from_raw)
    }

    /// Outlines of every collider, for the debug overlay
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        self.collider_set
            .iter()
            .filter_map(|(_, collider)| {
                let shape = if let Some(ball) = collider.shape().as_ball() {
                    Shape::Circle {
                        radius: ball.radius,
                    }
                } else if let Some(cuboid) = collider.shape().as_cuboid() {
                    Shape::Box {
                        half_width: cuboid.half_extents.x,
                        half_height: cuboid.half_extents.y,
                    }
                } else {
                    return None;
                };
                let enabled = collider
                    .parent()
                    .and_then(|parent| self.rigid_body_set.get(parent))
                    .is_none_or(|rb| rb.is_enabled());
                let iso = collider.position();
                Some(DebugShape {
                    position: Vec2::new(iso.translation.vector.x, iso.translation.vector.y),
                    angle: iso.rotation.angle(),
                    shape,
                    enabled,
                })
            })
            .collect()
    }
}
