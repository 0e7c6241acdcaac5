//! 2D drawing
//!
//! The game draws through [`DrawSurface`], a thin slice of the canvas 2D
//! API. The browser implementation lives in `platform::web`; tests use a
//! recording surface.

use crate::physics::{DebugShape, Shape};
use crate::sim::Scene;

/// Images the game draws, looked up by element id in the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Ship,
    Bullet,
    Asteroid,
    Explosion,
    Background,
}

impl Sprite {
    pub fn element_id(self) -> &'static str {
        match self {
            Sprite::Ship => "ship",
            Sprite::Bullet => "bullet",
            Sprite::Asteroid => "asteroid",
            Sprite::Explosion => "explosion",
            Sprite::Background => "background",
        }
    }
}

/// Canvas-like drawing target with a transform stack
pub trait DrawSurface {
    /// Backing size in pixels
    fn size(&self) -> (f64, f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);
    /// Blit a sprite into the given rectangle. Returns false when the image
    /// is missing or not loaded yet.
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64, w: f64, h: f64) -> bool;
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str);
    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, line_width: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, line_width: f64);
}

const OVERLAY_FONT: &str = "20pt Arial";
const OVERLAY_ORIGIN: (f64, f64) = (10.0, 10.0);
const OVERLAY_SHADOW_OFFSET: f64 = 2.0;

const DEBUG_ENABLED_COLOR: &str = "rgba(230, 178, 178, 1)";
const DEBUG_DISABLED_COLOR: &str = "rgba(128, 128, 77, 1)";

/// Stretch the background over the whole surface
pub fn draw_background(surface: &mut dyn DrawSurface) {
    let (width, height) = surface.size();
    surface.draw_sprite(Sprite::Background, 0.0, 0.0, width, height);
}

/// Draw every sized, sprited object centered on its body, y axis up
pub fn draw_scene(surface: &mut dyn DrawSurface, scene: &Scene, scale: f64) {
    let (width, height) = surface.size();
    surface.save();
    surface.translate(width / 2.0, height / 2.0);
    surface.scale(scale, -scale);

    for object in scene.objects() {
        let Some(sprite) = object.sprite else {
            continue;
        };
        if object.width == 0.0 || object.height == 0.0 {
            continue;
        }
        let position = scene.physics().position(object.body);
        let (w, h) = (f64::from(object.width), f64::from(object.height));

        surface.save();
        surface.translate(f64::from(position.x), f64::from(position.y));
        surface.rotate(f64::from(scene.physics().angle(object.body)));
        surface.draw_sprite(sprite, -w / 2.0, -h / 2.0, w, h);
        surface.restore();
    }

    surface.restore();
}

/// Outline every collider in world space
pub fn draw_debug(surface: &mut dyn DrawSurface, shapes: &[DebugShape], scale: f64) {
    let (width, height) = surface.size();
    let line_width = 1.0 / scale;
    surface.save();
    surface.translate(width / 2.0, height / 2.0);
    surface.scale(scale, -scale);

    for shape in shapes {
        let color = if shape.enabled {
            DEBUG_ENABLED_COLOR
        } else {
            DEBUG_DISABLED_COLOR
        };
        surface.save();
        surface.translate(f64::from(shape.position.x), f64::from(shape.position.y));
        surface.rotate(f64::from(shape.angle));
        match shape.shape {
            Shape::Circle { radius } => {
                surface.stroke_circle(0.0, 0.0, f64::from(radius), color, line_width)
            }
            Shape::Box {
                half_width,
                half_height,
            } => {
                let (hw, hh) = (f64::from(half_width), f64::from(half_height));
                surface.stroke_rect(-hw, -hh, 2.0 * hw, 2.0 * hh, color, line_width);
            }
        }
        surface.restore();
    }

    surface.restore();
}

/// Score in screen space with a 2px drop shadow
pub fn draw_overlay(surface: &mut dyn DrawSurface, score: i64) {
    let text = format!("Score: {score}");
    let (x, y) = OVERLAY_ORIGIN;
    surface.fill_text(
        &text,
        x + OVERLAY_SHADOW_OFFSET,
        y + OVERLAY_SHADOW_OFFSET,
        OVERLAY_FONT,
        "black",
    );
    surface.fill_text(&text, x, y, OVERLAY_FONT, "yellow");
}

/// Surface that draws nothing, for headless runs
#[derive(Debug, Clone, Copy)]
pub struct HeadlessSurface {
    pub width: f64,
    pub height: f64,
}

impl DrawSurface for HeadlessSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _x: f64, _y: f64) {}
    fn rotate(&mut self, _angle: f64) {}
    fn scale(&mut self, _x: f64, _y: f64) {}
    fn draw_sprite(&mut self, _sprite: Sprite, _x: f64, _y: f64, _w: f64, _h: f64) -> bool {
        false
    }
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64, _font: &str, _color: &str) {}
    fn stroke_circle(&mut self, _x: f64, _y: f64, _r: f64, _color: &str, _line_width: f64) {}
    fn stroke_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _color: &str, _lw: f64) {}
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingSurface};
    use super::*;
    use crate::physics::PhysicsWorld;
    use crate::sim::Spawn;
    use glam::Vec2;

    fn scene_with_asteroid_and_wall() -> Scene {
        let mut scene = Scene::new(PhysicsWorld::new_zero_gravity());
        scene.add(Spawn::Wall {
            center: Vec2::new(0.0, -10.0),
            width: 40.0,
            height: 0.5,
        });
        scene.add(Spawn::Asteroid {
            scale: 1.0,
            position: Vec2::new(2.0, 3.0),
            velocity: Vec2::ZERO,
        });
        scene
    }

    #[test]
    fn test_scene_is_centered_and_flipped() {
        let scene = scene_with_asteroid_and_wall();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_scene(&mut surface, &scene, 30.0);

        assert_eq!(surface.calls[1], Call::Translate(400.0, 300.0));
        assert_eq!(surface.calls[2], Call::Scale(30.0, -30.0));
        // Walls have no sprite, so only the asteroid is drawn
        assert_eq!(surface.sprites(), vec![Sprite::Asteroid]);
        assert!(surface.calls.contains(&Call::Sprite {
            sprite: Sprite::Asteroid,
            x: -2.0,
            y: -2.0,
            w: 4.0,
            h: 4.0,
        }));

        let saves = surface.calls.iter().filter(|c| **c == Call::Save).count();
        let restores = surface.calls.iter().filter(|c| **c == Call::Restore).count();
        assert_eq!(saves, restores);
    }

    #[test]
    fn test_unloaded_sprite_is_skipped() {
        let scene = scene_with_asteroid_and_wall();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        surface.missing.push(Sprite::Asteroid);
        draw_scene(&mut surface, &scene, 30.0);
        assert!(surface.sprites().is_empty());
    }

    #[test]
    fn test_background_fills_surface() {
        let mut surface = RecordingSurface::new(640.0, 480.0);
        draw_background(&mut surface);
        assert_eq!(
            surface.calls,
            vec![Call::Sprite {
                sprite: Sprite::Background,
                x: 0.0,
                y: 0.0,
                w: 640.0,
                h: 480.0,
            }]
        );
    }

    #[test]
    fn test_overlay_has_drop_shadow() {
        let mut surface = RecordingSurface::new(640.0, 480.0);
        draw_overlay(&mut surface, -42);
        assert_eq!(
            surface.texts(),
            vec![
                ("Score: -42".to_string(), 12.0, 12.0, "black".to_string()),
                ("Score: -42".to_string(), 10.0, 10.0, "yellow".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_outlines_every_collider() {
        let scene = scene_with_asteroid_and_wall();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_debug(&mut surface, &scene.debug_shapes(), 20.0);

        let outlines: Vec<_> = surface
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Circle { .. } | Call::Rect { .. }))
            .collect();
        assert_eq!(outlines.len(), 2);
        assert!(surface.calls.contains(&Call::Rect {
            w: 40.0,
            h: 0.5,
            color: DEBUG_ENABLED_COLOR.to_string(),
            line_width: 0.05,
        }));
    }

    #[test]
    fn test_sprite_ids() {
        assert_eq!(Sprite::Ship.element_id(), "ship");
        assert_eq!(Sprite::Background.element_id(), "background");
    }
}
