//! Sound effects
//!
//! Effects are pre-loaded `<audio>` elements in the host page. Each effect
//! id names a container element whose `<audio>` children form a small pool
//! of players, so overlapping plays of the same effect don't cut each other
//! off.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ship fires
    Shot,
    /// Asteroid splits in two
    AsteroidExplosion,
    /// Smallest asteroid destroyed
    AsteroidLastExplosion,
    /// Ship struck by an asteroid
    ShipExplosion,
}

impl SoundEffect {
    /// DOM id of the element holding this effect's players
    pub fn element_id(self) -> &'static str {
        match self {
            SoundEffect::Shot => "shot",
            SoundEffect::AsteroidExplosion => "asteroid_explosion",
            SoundEffect::AsteroidLastExplosion => "asteroid_last_explosion",
            SoundEffect::ShipExplosion => "ship_explosion",
        }
    }
}

/// Where the director sends the sounds a tick produced
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every sound (headless runs, failed audio setup)
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Snapshot of one child of an effect container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Whether the child is an `<audio>` element at all
    pub is_audio: bool,
    pub current_time: f64,
    pub ended: bool,
}

impl Voice {
    /// A player that has started and not finished is busy
    pub fn is_idle(&self) -> bool {
        !(self.current_time > 0.0 && !self.ended)
    }
}

/// Index of the first idle `<audio>` child, if any
pub fn first_idle(voices: &[Voice]) -> Option<usize> {
    voices.iter().position(|v| v.is_audio && v.is_idle())
}
