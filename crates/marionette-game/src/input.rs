//! Input system with action-based mapping
//!
//! Turns raw keyboard and mouse events into phased [`ActionEvent`]s. Directional keys form
//! a composite that drives the `Move` action, Space and Shift drive `Jump` and `Sprint`, and
//! captured mouse motion drives `Look`.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::action::{ActionEvent, ActionName, ActionPhase};
use crate::capability::{ActionEventSource, ActionHandler, SubscriptionId, Subscribers};

/// Button inputs a physical key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Sprint modifier (Shift by default)
    Sprint,
}

impl InputAction {
    fn is_directional(&self) -> bool {
        matches!(
            self,
            Self::MoveForward | Self::MoveBackward | Self::MoveLeft | Self::MoveRight
        )
    }
}

/// Binding of a physical input to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

/// Maps physical inputs to actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();

        // Default WASD bindings
        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Sprint);
        bindings.bind(KeyCode::ShiftRight, InputAction::Sprint);

        bindings
    }
}

impl InputBindings {
    /// Create input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings with nothing bound
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: InputAction) {
        self.insert(InputBinding::Mouse(button), action);
    }

    fn insert(&mut self, binding: InputBinding, action: InputAction) {
        if let Some(previous) = self.bindings.insert(binding, action) {
            if let Some(list) = self.reverse.get_mut(&previous) {
                list.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        let binding = InputBinding::Key(key);
        if let Some(action) = self.bindings.remove(&binding) {
            if let Some(bindings) = self.reverse.get_mut(&action) {
                bindings.retain(|b| *b != binding);
            }
        }
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.get_action(&InputBinding::Key(key))
    }

    /// All bindings for an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Pointer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y axis
    pub invert_y: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.0,
            invert_y: false,
        }
    }
}

/// Input handler that turns raw events into phased action events.
///
/// Subscribers are invoked synchronously from the `handle_*` calls, in arrival order.
#[derive(Debug)]
pub struct InputHandler {
    /// Input bindings
    pub bindings: InputBindings,
    /// Pointer configuration
    pub config: InputConfig,
    /// Physical inputs currently held, with the action they were bound to when pressed
    held: HashMap<InputBinding, InputAction>,
    /// Last composite value sent for `Move`
    move_value: Vec2,
    /// Whether the cursor is captured (invisible, locked)
    cursor_captured: bool,
    subscribers: Subscribers<ActionEvent>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::with_config(InputBindings::default(), InputConfig::default())
    }

    pub fn with_config(bindings: InputBindings, config: InputConfig) -> Self {
        Self {
            bindings,
            config,
            held: HashMap::new(),
            move_value: Vec2::ZERO,
            cursor_captured: false,
            subscribers: Subscribers::new(),
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.apply(InputBinding::Key(key_code), element_state);
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let button_id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };

        self.apply(InputBinding::Mouse(button_id), state);
    }

    /// Handle mouse movement
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.cursor_captured {
            return;
        }
        let y_mult = if self.config.invert_y { -1.0 } else { 1.0 };
        let look = Vec2::new(
            delta.0 as f32 * self.config.mouse_sensitivity,
            delta.1 as f32 * self.config.mouse_sensitivity * y_mult,
        );
        if look != Vec2::ZERO {
            self.emit(ActionEvent::axis(ActionName::LOOK, ActionPhase::Performed, look));
        }
    }

    /// Set cursor capture state
    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Check if any binding of an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.values().any(|held| *held == action)
    }

    /// Current composite movement vector
    pub fn move_vector(&self) -> Vec2 {
        self.move_value
    }

    /// Release everything held (e.g. on focus loss), canceling active actions
    pub fn release_all(&mut self) {
        let held: Vec<_> = self.held.keys().copied().collect();
        for binding in held {
            self.apply(binding, ElementState::Released);
        }
    }

    /// Track one physical input. Button actions start when their first binding goes down
    /// and cancel when their last binding comes up.
    fn apply(&mut self, binding: InputBinding, state: ElementState) {
        let action = match state {
            ElementState::Pressed => {
                // Key repeat
                if self.held.contains_key(&binding) {
                    return;
                }
                let Some(action) = self.bindings.get_action(&binding) else {
                    return;
                };
                let already_held = self.is_held(action);
                self.held.insert(binding, action);
                if already_held && !action.is_directional() {
                    return;
                }
                action
            }
            ElementState::Released => {
                let Some(action) = self.held.remove(&binding) else {
                    return;
                };
                if self.is_held(action) && !action.is_directional() {
                    return;
                }
                action
            }
        };

        let pressed = state == ElementState::Pressed;
        match action {
            InputAction::Jump => self.emit_button(ActionName::JUMP, pressed),
            InputAction::Sprint => self.emit_button(ActionName::SPRINT, pressed),
            _ => self.update_move(),
        }
    }

    fn emit_button(&mut self, name: ActionName, pressed: bool) {
        if pressed {
            self.emit(ActionEvent::button(name.clone(), ActionPhase::Started));
            self.emit(ActionEvent::button(name, ActionPhase::Performed));
        } else {
            self.emit(ActionEvent::button(name, ActionPhase::Canceled));
        }
    }

    fn composite(&self) -> Vec2 {
        let axis = |positive: InputAction, negative: InputAction| {
            let mut value = 0.0;
            if self.is_held(positive) {
                value += 1.0;
            }
            if self.is_held(negative) {
                value -= 1.0;
            }
            value
        };
        Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveForward, InputAction::MoveBackward),
        )
        .normalize_or_zero()
    }

    fn update_move(&mut self) {
        let value = self.composite();
        let previous = self.move_value;
        if value == previous {
            return;
        }
        self.move_value = value;

        if value == Vec2::ZERO {
            self.emit(ActionEvent::axis(ActionName::MOVE, ActionPhase::Canceled, value));
        } else {
            if previous == Vec2::ZERO {
                self.emit(ActionEvent::axis(ActionName::MOVE, ActionPhase::Started, value));
            }
            self.emit(ActionEvent::axis(ActionName::MOVE, ActionPhase::Performed, value));
        }
    }

    fn emit(&mut self, event: ActionEvent) {
        trace!("Action '{}' {:?} {:?}", event.name, event.phase, event.value);
        self.subscribers.notify(&event);
    }

    /// Whether any directional input is held
    pub fn is_moving(&self) -> bool {
        self.held.values().any(InputAction::is_directional)
    }
}

impl ActionEventSource for InputHandler {
    fn subscribe(&mut self, handler: ActionHandler) -> SubscriptionId {
        self.subscribers.add(handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}
