//! Scene and game objects
//!
//! All gameplay logic lives here:
//! - Fixed physics timestep only
//! - Seeded RNG only
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies beyond sprite/sound identifiers

pub mod object;
pub mod scene;
pub mod state;
pub mod tick;

pub use object::{GameObject, Hit, ObjectId, ObjectKind, ObjectTag, Spawn};
pub use scene::Scene;
pub use state::Player;
pub use tick::{Intents, TickContext};
