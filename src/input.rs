//! # Input state
//!
//! An explicit snapshot of everything gameplay reads each frame: pressed
//! game-pad keys, pointer movement and wheel deltas, pointer buttons, and the
//! pointer location for on-screen pads.
//!
//! The host feeds it from winit events (or the direct setters), passes it by
//! reference into the per-frame update, then calls [`InputState::end_frame`]
//! to clear the accumulated deltas.

use std::collections::HashSet;

use winit::dpi::PhysicalPosition;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::gfx::scene::gui::GuiTexture;

/// Logical buttons of the game pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePadKey {
    Up,
    Down,
    Left,
    Right,
    X,
    Triangle,
    Square,
    Circle,
}

impl GamePadKey {
    /// Keyboard binding of each key.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowUp | KeyCode::KeyW => Some(GamePadKey::Up),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(GamePadKey::Down),
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(GamePadKey::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(GamePadKey::Right),
            KeyCode::Space => Some(GamePadKey::X),
            KeyCode::KeyI => Some(GamePadKey::Triangle),
            KeyCode::KeyJ => Some(GamePadKey::Square),
            KeyCode::KeyL => Some(GamePadKey::Circle),
            _ => None,
        }
    }
}

/// Per-frame input snapshot.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<GamePadKey>,
    touch_keys: HashSet<GamePadKey>,
    pointer_dx: f32,
    pointer_dy: f32,
    wheel: f32,
    primary_down: bool,
    secondary_down: bool,
    /// Pointer location in normalized device coordinates
    pointer: Option<(f32, f32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a raw device event.
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button { button: 0, state } => {
                self.primary_down = *state == ElementState::Pressed;
            }
            DeviceEvent::Button { button: 1, state } => {
                self.secondary_down = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta } => {
                self.wheel += match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines * 120.0,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
            }
            DeviceEvent::MouseMotion { delta } => {
                self.pointer_dx += delta.0 as f32;
                // Screen y grows downwards, pitch input grows upwards
                self.pointer_dy -= delta.1 as f32;
            }
            _ => (),
        }
    }

    /// Feeds a keyboard event.
    pub fn process_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.set_key_code(code, event.state == ElementState::Pressed);
        }
    }

    pub fn set_key_code(&mut self, code: KeyCode, pressed: bool) {
        if let Some(key) = GamePadKey::from_key_code(code) {
            self.set_key(key, pressed);
        }
    }

    pub fn set_key(&mut self, key: GamePadKey, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// True when `key` is held on the keyboard or an on-screen pad.
    pub fn is_pressed(&self, key: GamePadKey) -> bool {
        self.keys.contains(&key) || self.touch_keys.contains(&key)
    }

    pub fn add_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.pointer_dx += dx;
        self.pointer_dy += dy;
    }

    pub fn add_wheel(&mut self, delta: f32) {
        self.wheel += delta;
    }

    pub fn set_primary_button(&mut self, down: bool) {
        self.primary_down = down;
    }

    pub fn set_secondary_button(&mut self, down: bool) {
        self.secondary_down = down;
    }

    /// Sets or clears the pointer location, in normalized device coordinates.
    pub fn set_pointer(&mut self, location: Option<(f32, f32)>) {
        self.pointer = location;
    }

    pub fn pointer_delta(&self) -> (f32, f32) {
        (self.pointer_dx, self.pointer_dy)
    }

    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    pub fn secondary_down(&self) -> bool {
        self.secondary_down
    }

    /// Presses the keys of every pad under the pointer, releasing the others.
    pub fn update_game_pad(&mut self, guis: &[GuiTexture]) {
        self.touch_keys.clear();
        let Some((x, y)) = self.pointer else {
            return;
        };
        for gui in guis {
            if let Some(key) = gui.key {
                if gui.contains_location(x, y) {
                    self.touch_keys.insert(key);
                }
            }
        }
    }

    /// Clears accumulated pointer and wheel deltas. Held keys and buttons stay.
    pub fn end_frame(&mut self) {
        self.pointer_dx = 0.0;
        self.pointer_dy = 0.0;
        self.wheel = 0.0;
    }
}
