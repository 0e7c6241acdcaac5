//! Game director
//!
//! Owns the scene and the session state around it (score, level, input)
//! and runs one animation frame at a time: level progression, simulation,
//! drawing and sound dispatch.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::AudioSink;
use crate::consts::{BASE_ASTEROIDS_PER_LEVEL, WALL_THICKNESS};
use crate::input::InputController;
use crate::physics::PhysicsWorld;
use crate::render::{self, DrawSurface};
use crate::settings::GameConfig;
use crate::sim::object::{random_spawn_position, random_velocity};
use crate::sim::{ObjectTag, Player, Scene, Spawn};
use crate::Viewport;

/// One game session
pub struct Blastroids {
    config: GameConfig,
    viewport: Viewport,
    scene: Scene,
    player: Player,
    input: InputController,
    rng: Pcg32,
    /// 0 until the first wave spawns
    level: u32,
}

impl Blastroids {
    pub fn new(config: GameConfig, viewport: Viewport, seed: u64) -> Self {
        let mut physics = PhysicsWorld::new_zero_gravity();
        physics.set_solver_iterations(config.solver_iterations);
        Self {
            config,
            viewport,
            scene: Scene::new(physics),
            player: Player::new(),
            input: InputController::new(),
            rng: Pcg32::seed_from_u64(seed),
            level: 0,
        }
    }

    /// Enclose the field and put the ship at the origin
    pub fn start(&mut self) {
        self.place_walls();
        self.scene.add(Spawn::Ship);
        log::info!(
            "Game started: {}x{} viewport",
            self.viewport.width,
            self.viewport.height
        );
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::info!("Resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.place_walls();
    }

    /// Replace the walls with four new ones on the edges of the visible field
    pub fn place_walls(&mut self) {
        for id in self.scene.ids(ObjectTag::Wall) {
            self.scene.remove(id);
        }

        let (width, height) = self.viewport.field_size(self.config.field_height);
        let (hw, hh) = (width / 2.0, height / 2.0);
        let walls = [
            (Vec2::new(0.0, hh), width, WALL_THICKNESS),
            (Vec2::new(0.0, -hh), width, WALL_THICKNESS),
            (Vec2::new(-hw, 0.0), WALL_THICKNESS, height),
            (Vec2::new(hw, 0.0), WALL_THICKNESS, height),
        ];
        for (center, width, height) in walls {
            self.scene.add(Spawn::Wall {
                center,
                width,
                height,
            });
        }
        log::debug!("Walls placed around a {:.1}x{:.1} field", width, height);
    }

    /// Spawn the full-size asteroids of a level
    pub fn init_level(&mut self, level: u32) {
        let count = BASE_ASTEROIDS_PER_LEVEL + level;
        log::info!("Level {}: {} asteroids", level, count);
        for _ in 0..count {
            let position = random_spawn_position(&mut self.rng);
            let velocity = random_velocity(&mut self.rng);
            self.scene.add(Spawn::Asteroid {
                scale: 1.0,
                position,
                velocity,
            });
        }
    }

    pub fn asteroid_count(&self) -> usize {
        self.scene.count(ObjectTag::Asteroid)
    }

    /// Run one animation frame at frame-clock `time`
    pub fn frame(&mut self, time: f64, surface: &mut dyn DrawSurface, audio: &mut dyn AudioSink) {
        if self.asteroid_count() == 0 {
            self.level += 1;
            self.init_level(self.level);
        }

        render::draw_background(surface);

        if !self.input.is_paused() {
            let sounds = self.scene.update(
                time,
                &mut self.player,
                self.input.state_mut(),
                &mut self.rng,
            );
            for sound in sounds {
                audio.play(sound);
            }
        }

        let scale = self.viewport.scale(self.config.field_height);
        render::draw_scene(surface, &self.scene, scale);
        if self.config.debug {
            render::draw_debug(surface, &self.scene.debug_shapes(), scale);
        }
        render::draw_overlay(surface, self.player.score);
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::render::Sprite;
    use crate::render::testing::{Call, RecordingSurface};

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<SoundEffect>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }
    }

    fn started(config: GameConfig) -> Blastroids {
        let mut game = Blastroids::new(config, Viewport::new(800.0, 600.0), 99);
        game.start();
        game
    }

    fn run_frame(game: &mut Blastroids, time: f64) -> (RecordingSurface, RecordingAudio) {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut audio = RecordingAudio::default();
        game.frame(time, &mut surface, &mut audio);
        (surface, audio)
    }

    #[test]
    fn test_start_places_ship_and_walls() {
        let game = started(GameConfig::default());
        assert_eq!(game.scene().count(ObjectTag::Ship), 1);
        assert_eq!(game.scene().count(ObjectTag::Wall), 4);
        assert_eq!(game.level(), 0);
        assert_eq!(game.asteroid_count(), 0);
    }

    #[test]
    fn test_level_progression() {
        let mut game = started(GameConfig::default());
        run_frame(&mut game, 16.0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.asteroid_count(), 6);

        // Asteroids left alive keep the level
        run_frame(&mut game, 32.0);
        assert_eq!(game.level(), 1);

        for id in game.scene().ids(ObjectTag::Asteroid) {
            game.scene_mut().remove(id);
        }
        run_frame(&mut game, 48.0);
        assert_eq!(game.level(), 2);
        assert_eq!(game.asteroid_count(), 7);
    }

    #[test]
    fn test_init_level_spawns_inside_bounds() {
        let mut game = started(GameConfig::default());
        game.init_level(3);
        assert_eq!(game.asteroid_count(), 8);
        for object in game.scene().objects() {
            if object.tag() == ObjectTag::Asteroid {
                let p = game.scene().physics().position(object.body);
                assert!(p.x.abs() <= 9.0 && p.y.abs() <= 9.0);
                assert_eq!(object.width, 4.0);
            }
        }
    }

    #[test]
    fn test_resize_replaces_walls() {
        let mut game = started(GameConfig::default());
        game.resize(Viewport::new(1000.0, 500.0));
        game.resize(Viewport::new(400.0, 800.0));
        assert_eq!(game.scene().count(ObjectTag::Wall), 4);

        run_frame(&mut game, 16.0);
        let walls: Vec<_> = game
            .scene()
            .objects()
            .iter()
            .filter(|o| o.tag() == ObjectTag::Wall)
            .collect();
        assert_eq!(walls.len(), 4, "stale walls are gone after a tick");
        // 400x800 at 20 units high is a 10x20 field
        assert!(walls.iter().any(|w| (w.width - 10.0).abs() < 1e-4));
        assert!(walls.iter().any(|w| (w.height - 20.0).abs() < 1e-4));
    }

    #[test]
    fn test_bomb_pauses_simulation() {
        let mut game = started(GameConfig::default());
        run_frame(&mut game, 16.0);
        let before: Vec<_> = game
            .scene()
            .objects()
            .iter()
            .map(|o| game.scene().physics().position(o.body))
            .collect();

        game.input_mut().key_down("b");
        game.input_mut().key_down(" ");
        let (surface, audio) = run_frame(&mut game, 1000.0);

        let after: Vec<_> = game
            .scene()
            .objects()
            .iter()
            .map(|o| game.scene().physics().position(o.body))
            .collect();
        assert_eq!(before, after);
        assert_eq!(game.player().score, 0);
        assert!(audio.played.is_empty());
        // Still drawn while paused
        assert!(surface.sprites().contains(&Sprite::Ship));
    }

    #[test]
    fn test_shot_sound_is_forwarded() {
        let mut game = started(GameConfig::default());
        game.input_mut().key_down(" ");
        let (_, audio) = run_frame(&mut game, 1000.0);
        assert!(audio.played.contains(&SoundEffect::Shot));
        assert_eq!(game.scene().count(ObjectTag::Bullet), 1);
    }

    #[test]
    fn test_frame_draw_order() {
        let mut game = started(GameConfig::default());
        let (surface, _) = run_frame(&mut game, 16.0);

        assert_eq!(surface.sprites().first(), Some(&Sprite::Background));
        let texts = surface.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].3, "black");
        assert_eq!(texts[1].3, "yellow");
        assert!(matches!(surface.calls.last(), Some(Call::Text { .. })));
        assert!(
            !surface
                .calls
                .iter()
                .any(|c| matches!(c, Call::Circle { .. } | Call::Rect { .. }))
        );
    }

    #[test]
    fn test_debug_overlay_outlines_colliders() {
        let config = GameConfig {
            debug: true,
            ..Default::default()
        };
        let mut game = started(config);
        let (surface, _) = run_frame(&mut game, 16.0);
        let rects = surface
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Rect { .. }))
            .count();
        // Four walls and the ship
        assert_eq!(rects, 5);
    }

    #[test]
    fn test_same_seed_same_level() {
        let positions = |seed| {
            let mut game = Blastroids::new(GameConfig::default(), Viewport::new(800.0, 600.0), seed);
            game.init_level(1);
            game.scene()
                .objects()
                .iter()
                .map(|o| game.scene().physics().position(o.body))
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(5), positions(5));
        assert_ne!(positions(5), positions(6));
    }
}
