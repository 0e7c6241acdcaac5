//! Live object set and the two-phase tick

use rand_pcg::Pcg32;

use super::object::{GameObject, Hit, ObjectId, ObjectTag, Spawn};
use super::state::Player;
use super::tick::TickContext;
use crate::audio::SoundEffect;
use crate::consts::PHYSICS_DT;
use crate::input::InputState;
use crate::physics::{Contact, DebugShape, PhysicsWorld};

/// Owns the physics world and every live game object
pub struct Scene {
    physics: PhysicsWorld,
    /// Registration order, which is also update order
    objects: Vec<GameObject>,
    /// Contacts that began during the last step, resolved on the next update
    contacts: Vec<Contact>,
    next_id: u32,
}

impl Scene {
    pub fn new(physics: PhysicsWorld) -> Self {
        Self {
            physics,
            objects: Vec::new(),
            contacts: Vec::new(),
            next_id: 1,
        }
    }

    /// Create an object and its body, returning its id
    pub fn add(&mut self, spawn: Spawn) -> ObjectId {
        let id = ObjectId::from_raw(self.next_id);
        self.next_id += 1;
        log::trace!("Spawn {} {:?}", id, spawn.tag());
        let object = GameObject::build(id, spawn, &mut self.physics);
        self.objects.push(object);
        id
    }

    /// Mark an object for removal at the end of the current (or next) update
    pub fn remove(&mut self, id: ObjectId) {
        if let Some(object) = self.objects.iter_mut().find(|o| o.id == id) {
            object.deleted = true;
        }
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Live objects of one variant, ignoring those already marked for removal
    pub fn count(&self, tag: ObjectTag) -> usize {
        self.objects
            .iter()
            .filter(|o| !o.deleted && o.tag() == tag)
            .count()
    }

    pub fn ids(&self, tag: ObjectTag) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| !o.deleted && o.tag() == tag)
            .map(|o| o.id)
            .collect()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        self.physics.debug_shapes()
    }

    /// Queue a contact pair for the next resolution pass
    pub fn record_contact(&mut self, a: ObjectId, b: ObjectId) {
        self.contacts.push(Contact { a, b });
    }

    /// Hand every queued contact to both participants. Repeated pairs
    /// produce repeated hits.
    pub(crate) fn resolve_contacts(&mut self) {
        for Contact { a, b } in std::mem::take(&mut self.contacts) {
            let (Some(tag_a), Some(tag_b)) = (self.get(a).map(|o| o.tag()), self.get(b).map(|o| o.tag()))
            else {
                continue;
            };
            for object in &mut self.objects {
                if object.id == a {
                    object.hit_by.push(Hit { by: b, tag: tag_b });
                } else if object.id == b {
                    object.hit_by.push(Hit { by: a, tag: tag_a });
                }
            }
        }
    }

    /// Advance one tick.
    ///
    /// Resolves last step's contacts, runs every rule in registration order,
    /// clears hits, applies removals then spawns, steps physics and clears
    /// forces. Returns the sounds the rules asked for.
    pub fn update(
        &mut self,
        time: f64,
        player: &mut Player,
        input: &mut InputState,
        rng: &mut Pcg32,
    ) -> Vec<SoundEffect> {
        self.resolve_contacts();

        let mut ctx = TickContext {
            time,
            player,
            input,
            rng,
            intents: Default::default(),
        };
        for object in &mut self.objects {
            object.update(&mut self.physics, &mut ctx);
        }
        let intents = ctx.intents;

        for id in intents.removals {
            self.remove(id);
        }
        let physics = &mut self.physics;
        self.objects.retain_mut(|object| {
            object.hit_by.clear();
            if object.deleted {
                log::trace!("Remove {} {:?}", object.id, object.tag());
                physics.destroy_body(object.body);
                false
            } else {
                true
            }
        });
        for spawn in intents.spawns {
            self.add(spawn);
        }

        let contacts = self.physics.step(PHYSICS_DT);
        self.contacts.extend(contacts);
        self.physics.clear_forces();

        intents.sounds
    }
}
