//! Blastroids - a physics-driven Asteroids variant for the browser
//!
//! Core modules:
//! - `physics`: Thin adapter over the rapier2d rigid-body world
//! - `sim`: Scene, game objects and their per-tick update rules
//! - `input`: Keyboard/touch events to a normalized control vector
//! - `director`: Level progression, spawning and frame orchestration
//! - `render`: 2D drawing boundary and scene/overlay drawing
//! - `audio`: Sound identifiers and pooled `<audio>` playback
//! - `settings`: Explicit game configuration
//! - `platform`: Browser implementations of the drawing boundary

pub mod audio;
pub mod director;
pub mod input;
pub mod physics;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use director::Blastroids;
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep per frame (seconds of simulated time)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;

    /// World units spanned by the viewport height
    pub const FIELD_HEIGHT: f64 = 20.0;
    /// Thickness of the boundary walls
    pub const WALL_THICKNESS: f32 = 0.5;

    /// Ship body
    pub const SHIP_WIDTH: f32 = 1.0;
    pub const SHIP_HEIGHT: f32 = 2.0;
    pub const SHIP_LINEAR_DAMPING: f32 = 5.0;
    pub const SHIP_ANGULAR_DAMPING: f32 = 8.0;
    /// Forward force at full throttle
    pub const SHIP_THRUST: f32 = 100.0;
    /// Torque at full steering
    pub const SHIP_TORQUE: f32 = 45.0;

    /// Minimum frame-clock time between shots
    pub const SHOT_COOLDOWN: f64 = 250.0;
    /// Bullet speed relative to the ship
    pub const MUZZLE_SPEED: f32 = 25.0;
    pub const BULLET_RADIUS: f32 = 0.5;

    /// Asteroid size at scale 1
    pub const ASTEROID_SIZE: f32 = 4.0;
    /// Asteroids at or above this scale split instead of vanishing
    pub const ASTEROID_SPLIT_SCALE: f32 = 0.49;
    /// Per-axis velocity bound for spawned and split asteroids
    pub const ASTEROID_MAX_SPEED: f32 = 10.0;
    /// Per-axis bound of the level spawn area
    pub const ASTEROID_SPAWN_EXTENT: f32 = 9.0;
    /// Asteroids per level are this plus the level number
    pub const BASE_ASTEROIDS_PER_LEVEL: u32 = 5;

    pub const EXPLOSION_RADIUS: f32 = 2.0;
    /// Frame-clock time an explosion stays on screen
    pub const EXPLOSION_LIFETIME: f64 = 100.0;

    /// Score changes
    pub const SHOT_COST: i64 = 2;
    pub const SHIP_HIT_PENALTY: i64 = 200;
    pub const ASTEROID_SPLIT_REWARD: i64 = 25;
    pub const ASTEROID_DESTROY_REWARD: i64 = 100;
}

/// Size of the browser window in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixels per world unit when `field_height` units span the height
    pub fn scale(&self, field_height: f64) -> f64 {
        self.height / field_height
    }

    /// Visible field size in world units
    pub fn field_size(&self, field_height: f64) -> (f32, f32) {
        let scale = self.scale(field_height);
        ((self.width / scale) as f32, (self.height / scale) as f32)
    }
}
