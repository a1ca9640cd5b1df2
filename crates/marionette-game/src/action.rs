//! Phased action events
//!
//! The input layer reduces raw device events to named actions moving through a
//! Started → Performed → Canceled lifecycle. Consumers match on the name and phase and
//! ignore anything they do not recognize.

use std::borrow::Cow;
use std::fmt;

use glam::Vec2;

/// Name of an input action.
///
/// The action set is open: the well-known names are exposed as constants, but any
/// string is a valid name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionName(Cow<'static, str>);

impl ActionName {
    /// 2D locomotion input
    pub const MOVE: ActionName = ActionName(Cow::Borrowed("Move"));
    /// Sprint modifier (held)
    pub const SPRINT: ActionName = ActionName(Cow::Borrowed("Sprint"));
    /// Jump button
    pub const JUMP: ActionName = ActionName(Cow::Borrowed("Jump"));
    /// 2D camera look delta
    pub const LOOK: ActionName = ActionName(Cow::Borrowed("Look"));

    /// Create an action name from any string
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle stage of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    /// First frame the action was triggered
    Started,
    /// The action is considered active (repeats for value changes)
    Performed,
    /// The action was released or ended
    Canceled,
}

/// Payload carried by an action event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActionValue {
    /// Button-like actions carry no value
    #[default]
    None,
    /// Stick, composite or pointer delta
    Axis2(Vec2),
}

impl ActionValue {
    /// The 2D payload, if this value carries one
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            ActionValue::Axis2(v) => Some(*v),
            ActionValue::None => None,
        }
    }
}

/// A single triggered action. Produced by an action source and consumed synchronously.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub name: ActionName,
    pub phase: ActionPhase,
    pub value: ActionValue,
}

impl ActionEvent {
    pub fn new(name: ActionName, phase: ActionPhase, value: ActionValue) -> Self {
        Self { name, phase, value }
    }

    /// Button-style event without a payload
    pub fn button(name: ActionName, phase: ActionPhase) -> Self {
        Self::new(name, phase, ActionValue::None)
    }

    /// Event carrying a 2D payload
    pub fn axis(name: ActionName, phase: ActionPhase, value: Vec2) -> Self {
        Self::new(name, phase, ActionValue::Axis2(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_names_compare_with_owned() {
        assert_eq!(ActionName::MOVE, ActionName::new(String::from("Move")));
        assert_ne!(ActionName::MOVE, ActionName::new("move"));
        assert_eq!(ActionName::LOOK.as_str(), "Look");
    }

    #[test]
    fn axis_payload() {
        let ev = ActionEvent::axis(ActionName::LOOK, ActionPhase::Performed, Vec2::new(1.0, -2.0));
        assert_eq!(ev.value.as_vec2(), Some(Vec2::new(1.0, -2.0)));

        let ev = ActionEvent::button(ActionName::JUMP, ActionPhase::Started);
        assert_eq!(ev.value.as_vec2(), None);
    }
}
