//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard input state tracking
//! - Mouse button state tracking
//! - Mouse motion accumulation

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

/// Keys whose state transitions are tracked.
pub const KEY_CODES: [KeyCode; 5] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
];

/// Mouse buttons whose state transitions are tracked.
pub const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current state of keyboard and mouse inputs
/// and provides methods to process input events from the windowing system.
#[derive(Debug)]
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|button| (*button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_delta: None,
            },
        }
    }

    /// Updates the old state with the current state to prepare for the next snapshot.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.intake_key(*key, *state),
            WindowEvent::MouseInput { button, state, .. } => {
                self.intake_mouse_button(*button, *state)
            }
            _ => {}
        }
    }

    /// Records a key press or release. Untracked keys are ignored.
    pub fn intake_key(&mut self, key: KeyCode, state: ElementState) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = state == ElementState::Pressed;
        }
    }

    /// Records a mouse button press or release. Untracked buttons are ignored.
    pub fn intake_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = state == ElementState::Pressed;
        }
    }

    /// Adds a raw mouse movement to the delta accumulated since the last snapshot.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of mouse movement
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Creates a processed input state from the current raw boolean states.
    ///
    /// This translates the raw boolean states into RawInputState enum values
    /// that represent the state transitions (pressed, held, released, not pressed).
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns the processed input state and resets internal state for the next snapshot.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Rolls current states into the previous ones and clears accumulated motion.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.mouse_inputs.mouse_delta = None;
    }

    /// Releases every key and button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for state in self.keyboard_inputs_new.values_mut() {
            *state = false;
        }
        for state in self.mouse_inputs.mouse_button_inputs_new.values_mut() {
            *state = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_transitions_across_snapshots() {
        let mut input = InputManager::new();
        input.intake_key(KeyCode::KeyW, ElementState::Pressed);
        let first = input.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::KeyW), RawInputState::Pressed);

        let second = input.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::KeyW), RawInputState::Held);

        input.intake_key(KeyCode::KeyW, ElementState::Released);
        let third = input.get_and_reset_processed_input();
        assert_eq!(third.get_key_state(KeyCode::KeyW), RawInputState::Released);

        let fourth = input.get_and_reset_processed_input();
        assert_eq!(fourth.get_key_state(KeyCode::KeyW), RawInputState::NotPressed);
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input = InputManager::new();
        input.intake_key(KeyCode::KeyQ, ElementState::Pressed);
        let state = input.get_and_reset_processed_input();
        assert!(!state.keyboard_states.contains_key(&KeyCode::KeyQ));
    }

    #[test]
    fn mouse_motion_accumulates_until_snapshot() {
        let mut input = InputManager::new();
        input.intake_mouse_motion((1.5, -2.0));
        input.intake_mouse_motion((0.5, 1.0));
        input.intake_mouse_button(MouseButton::Right, ElementState::Pressed);

        let state = input.get_and_reset_processed_input();
        assert_eq!(state.get_mouse_delta(), Some((2.0, -1.0)));
        assert!(state.get_mouse_button_state(MouseButton::Right).is_just_pressed());

        let next = input.get_and_reset_processed_input();
        assert_eq!(next.get_mouse_delta(), None);
    }

    #[test]
    fn releasing_everything_reports_releases() {
        let mut input = InputManager::new();
        input.intake_key(KeyCode::Space, ElementState::Pressed);
        input.intake_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.get_and_reset_processed_input();

        input.release_all();
        let state = input.get_and_reset_processed_input();
        assert!(state.get_key_state(KeyCode::Space).is_just_released());
        assert!(state.get_mouse_button_state(MouseButton::Left).is_just_released());
    }
}
