//! Keyboard and touch input
//!
//! Device callbacks feed [`InputController`]; the ship reads the resulting
//! [`InputState`] once per tick.

use crate::Viewport;

/// Normalized control vector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// 1 turns left (counter-clockwise), -1 turns right, 0 holds
    pub steering: i8,
    /// Pending turn from a touch drag, consumed by the next tick
    pub angle: Option<f32>,
    /// Forward thrust in [0, 1]
    pub throttle: f32,
    /// Fire while held
    pub trigger: bool,
    /// Pause toggle
    pub bomb: bool,
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Fire,
    Bomb,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            "ArrowUp" | "Up" => Some(Key::Up),
            " " | "Spacebar" => Some(Key::Fire),
            "b" | "B" => Some(Key::Bomb),
            _ => None,
        }
    }
}

/// One entry of a touch event's changed-touches list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

/// Fraction of the viewport width that turns the ship by one radian
const DRAG_TURN_DIVISOR: f32 = 24.0;
/// Fraction of the viewport height that gives full throttle
const DRAG_THROTTLE_DIVISOR: f32 = 4.0;

/// Turns device events into an [`InputState`]
#[derive(Debug, Clone, Default)]
pub struct InputController {
    state: InputState,
    left_pressed: bool,
    right_pressed: bool,
    steer_touch: Option<i32>,
    trigger_touch: Option<i32>,
    down_y: f32,
    last_x: f32,
}

/// Last entry with the given identifier
fn touch_with_id(touches: &[TouchPoint], id: i32) -> Option<&TouchPoint> {
    touches.iter().rev().find(|t| t.id == id)
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.bomb
    }

    pub fn key_down(&mut self, key: &str) {
        match Key::from_dom(key) {
            Some(Key::Left) => {
                self.state.steering = 1;
                self.left_pressed = true;
            }
            Some(Key::Right) => {
                self.state.steering = -1;
                self.right_pressed = true;
            }
            Some(Key::Up) => self.state.throttle = 1.0,
            Some(Key::Fire) => self.state.trigger = true,
            Some(Key::Bomb) => {
                self.state.bomb = !self.state.bomb;
                log::info!("Paused: {}", self.state.bomb);
            }
            None => log::info!("Unhandled key: {:?}", key),
        }
    }

    pub fn key_up(&mut self, key: &str) {
        match Key::from_dom(key) {
            // Releasing one arrow falls back to the other if it is still held
            Some(Key::Left) => {
                self.state.steering = if self.right_pressed { -1 } else { 0 };
                self.left_pressed = false;
            }
            Some(Key::Right) => {
                self.state.steering = if self.left_pressed { 1 } else { 0 };
                self.right_pressed = false;
            }
            Some(Key::Up) => self.state.throttle = 0.0,
            Some(Key::Fire) => self.state.trigger = false,
            Some(Key::Bomb) => {}
            None => log::info!("Unhandled key: {:?}", key),
        }
    }

    /// Left half claims the steering touch, right half the trigger touch
    pub fn touch_start(&mut self, touches: &[TouchPoint], viewport: Viewport) {
        let half_width = (viewport.width / 2.0) as f32;
        for touch in touches {
            if touch.x < half_width {
                if self.steer_touch.is_none() {
                    self.steer_touch = Some(touch.id);
                    self.last_x = touch.x;
                    self.down_y = touch.y;
                }
            } else if self.trigger_touch.is_none() {
                self.trigger_touch = Some(touch.id);
                self.state.trigger = true;
            }
        }
    }

    /// Horizontal drag turns, dragging up from the touch-down point throttles
    pub fn touch_move(&mut self, touches: &[TouchPoint], viewport: Viewport) {
        let Some(id) = self.steer_touch else { return };
        let Some(touch) = touch_with_id(touches, id) else {
            return;
        };

        let dx = touch.x - self.last_x;
        let turn = -dx / (viewport.width as f32 / DRAG_TURN_DIVISOR);
        self.state.angle = Some(self.state.angle.unwrap_or(0.0) + turn);
        self.state.steering = 0;
        self.state.throttle =
            (-(touch.y - self.down_y) / (viewport.height as f32 / DRAG_THROTTLE_DIVISOR))
                .clamp(0.0, 1.0);

        self.last_x = touch.x;
    }

    pub fn touch_end(&mut self, touches: &[TouchPoint]) {
        if let Some(id) = self.steer_touch {
            if touch_with_id(touches, id).is_some() {
                self.state.throttle = 0.0;
                self.steer_touch = None;
            }
        }
        if let Some(id) = self.trigger_touch {
            if touch_with_id(touches, id).is_some() {
                self.state.trigger = false;
                self.trigger_touch = None;
            }
        }
    }

    /// The browser took the touches away; same as lifting them
    pub fn touch_cancel(&mut self, touches: &[TouchPoint]) {
        self.touch_end(touches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn touch(id: i32, x: f32, y: f32) -> TouchPoint {
        TouchPoint { id, x, y }
    }

    #[test]
    fn test_steering_falls_back_to_held_key() {
        let mut input = InputController::new();
        input.key_down("ArrowLeft");
        assert_eq!(input.state().steering, 1);
        input.key_down("ArrowRight");
        assert_eq!(input.state().steering, -1);
        input.key_up("ArrowRight");
        assert_eq!(input.state().steering, 1);
        input.key_up("ArrowLeft");
        assert_eq!(input.state().steering, 0);
    }

    #[test]
    fn test_throttle_trigger_and_bomb_keys() {
        let mut input = InputController::new();
        input.key_down("ArrowUp");
        input.key_down(" ");
        assert_eq!(input.state().throttle, 1.0);
        assert!(input.state().trigger);

        input.key_up("ArrowUp");
        input.key_up(" ");
        assert_eq!(input.state().throttle, 0.0);
        assert!(!input.state().trigger);

        input.key_down("b");
        assert!(input.is_paused());
        input.key_up("b");
        assert!(input.is_paused(), "release does not toggle");
        input.key_down("B");
        assert!(!input.is_paused());
    }

    #[test]
    fn test_unknown_key_changes_nothing() {
        let mut input = InputController::new();
        input.key_down("q");
        input.key_up("Escape");
        assert_eq!(*input.state(), InputState::default());
    }

    #[test]
    fn test_left_touch_drags_angle_and_throttle() {
        let mut input = InputController::new();
        input.touch_start(&[touch(3, 100.0, 400.0)], VIEW);
        assert!(!input.state().trigger);

        // 100px right is -3 rad at 800px width; 75px up is half throttle
        input.touch_move(&[touch(3, 200.0, 325.0)], VIEW);
        let angle = input.state().angle.unwrap_or_default();
        assert!((angle + 3.0).abs() < 1e-5, "got {angle}");
        assert!((input.state().throttle - 0.5).abs() < 1e-5);
        assert_eq!(input.state().steering, 0);

        // Dragging below the touch-down point never reverses
        input.touch_move(&[touch(3, 200.0, 500.0)], VIEW);
        assert_eq!(input.state().throttle, 0.0);

        input.touch_move(&[touch(3, 200.0, 0.0)], VIEW);
        assert_eq!(input.state().throttle, 1.0);

        input.touch_end(&[touch(3, 200.0, 0.0)]);
        assert_eq!(input.state().throttle, 0.0);
    }

    #[test]
    fn test_pending_angle_accumulates_until_consumed() {
        let mut input = InputController::new();
        input.touch_start(&[touch(1, 100.0, 300.0)], VIEW);
        input.touch_move(&[touch(1, 110.0, 300.0)], VIEW);
        input.touch_move(&[touch(1, 120.0, 300.0)], VIEW);
        let angle = input.state_mut().angle.take().unwrap_or_default();
        assert!((angle + 0.6).abs() < 1e-5, "got {angle}");

        input.touch_move(&[touch(1, 120.0, 300.0)], VIEW);
        assert_eq!(input.state().angle, Some(0.0));
    }

    #[test]
    fn test_right_touch_is_trigger() {
        let mut input = InputController::new();
        input.touch_start(&[touch(5, 600.0, 300.0)], VIEW);
        assert!(input.state().trigger);

        // A second right-half touch is not tracked; lifting it does nothing
        input.touch_start(&[touch(6, 700.0, 300.0)], VIEW);
        input.touch_end(&[touch(6, 700.0, 300.0)]);
        assert!(input.state().trigger);

        input.touch_cancel(&[touch(5, 600.0, 300.0)]);
        assert!(!input.state().trigger);
    }

    #[test]
    fn test_untracked_move_is_ignored() {
        let mut input = InputController::new();
        input.touch_start(&[touch(1, 100.0, 300.0)], VIEW);
        input.touch_move(&[touch(2, 300.0, 0.0)], VIEW);
        assert_eq!(input.state().angle, None);
        assert_eq!(input.state().throttle, 0.0);
    }

    #[test]
    fn test_both_halves_at_once() {
        let mut input = InputController::new();
        input.touch_start(&[touch(1, 100.0, 300.0), touch(2, 700.0, 300.0)], VIEW);
        assert!(input.state().trigger);
        input.touch_move(&[touch(1, 100.0, 150.0)], VIEW);
        assert_eq!(input.state().throttle, 1.0);

        input.touch_end(&[touch(1, 100.0, 150.0)]);
        assert_eq!(input.state().throttle, 0.0);
        assert!(input.state().trigger, "trigger touch still down");
    }

    proptest! {
        /// Steering always points at the most recently pressed arrow still held
        #[test]
        fn prop_steering_matches_held_arrows(events in prop::collection::vec((any::<bool>(), any::<bool>()), 0..40)) {
            let mut input = InputController::new();
            let mut held: Vec<i8> = Vec::new();
            for (left, press) in events {
                let (key, dir) = if left { ("ArrowLeft", 1) } else { ("ArrowRight", -1) };
                if press {
                    input.key_down(key);
                    held.retain(|d| *d != dir);
                    held.push(dir);
                } else {
                    input.key_up(key);
                    held.retain(|d| *d != dir);
                }
                let expected = held.last().copied().unwrap_or(0);
                prop_assert_eq!(input.state().steering, expected);
            }
        }
    }
}
