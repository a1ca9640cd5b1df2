//! In-process animation parameter store
//!
//! A minimal animation graph front end: parameters are declared by name and kind,
//! resolved to handles, and written by the control layer. Damped float writes follow an
//! exponential approach so repeated writes toward a fixed target converge monotonically.

use std::collections::HashMap;

use tracing::debug;

use crate::capability::{AnimationEngine, ParameterId};
use crate::error::ControlError;

use super::ParameterNames;

/// Kind of a declared animation parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Float,
    Bool,
    /// One-shot flag, latched until consumed by the graph
    Trigger,
}

/// Current value of a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Float(f32),
    Bool(bool),
    Trigger(bool),
}

impl ParameterValue {
    fn default_for(kind: ParameterKind) -> Self {
        match kind {
            ParameterKind::Float => Self::Float(0.0),
            ParameterKind::Bool => Self::Bool(false),
            ParameterKind::Trigger => Self::Trigger(false),
        }
    }
}

/// Exponential approach of `current` toward `target`.
///
/// A non-positive `damp_time` snaps to the target; a non-positive `delta_time` leaves the
/// value unchanged.
pub fn damp(current: f32, target: f32, damp_time: f32, delta_time: f32) -> f32 {
    if damp_time <= 0.0 {
        return target;
    }
    if delta_time <= 0.0 {
        return current;
    }
    let t = 1.0 - (-delta_time / damp_time).exp();
    current + (target - current) * t
}

#[derive(Debug, Clone)]
struct Parameter {
    name: String,
    value: ParameterValue,
}

/// Parameter store implementing [`AnimationEngine`]
#[derive(Debug, Clone, Default)]
pub struct Animator {
    parameters: Vec<Parameter>,
    by_name: HashMap<String, ParameterId>,
}

impl Animator {
    /// Create an animator with no parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Animator declaring the six locomotion parameters under the given names
    pub fn locomotion_controller(names: &ParameterNames) -> Result<Self, ControlError> {
        let mut animator = Self::new();
        animator.declare(&names.speed, ParameterKind::Float)?;
        animator.declare(&names.is_ground, ParameterKind::Bool)?;
        animator.declare(&names.forward, ParameterKind::Float)?;
        animator.declare(&names.side_step, ParameterKind::Float)?;
        animator.declare(&names.jump_start, ParameterKind::Trigger)?;
        animator.declare(&names.double_jump, ParameterKind::Trigger)?;
        Ok(animator)
    }

    /// Declare a parameter
    pub fn declare(&mut self, name: &str, kind: ParameterKind) -> Result<ParameterId, ControlError> {
        if self.by_name.contains_key(name) {
            return Err(ControlError::DuplicateParameter(name.to_string()));
        }
        let id = ParameterId(self.parameters.len() as u32);
        self.parameters.push(Parameter {
            name: name.to_string(),
            value: ParameterValue::default_for(kind),
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Current value of a parameter
    pub fn value(&self, id: ParameterId) -> Option<ParameterValue> {
        self.parameters.get(id.0 as usize).map(|p| p.value)
    }

    /// Current float value, if the parameter is a float
    pub fn float(&self, id: ParameterId) -> Option<f32> {
        match self.value(id)? {
            ParameterValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Current bool value, if the parameter is a bool
    pub fn bool(&self, id: ParameterId) -> Option<bool> {
        match self.value(id)? {
            ParameterValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Whether a trigger is latched
    pub fn is_triggered(&self, id: ParameterId) -> bool {
        matches!(self.value(id), Some(ParameterValue::Trigger(true)))
    }

    /// Consume a latched trigger, returning whether it was set
    pub fn consume_trigger(&mut self, id: ParameterId) -> bool {
        match self.parameters.get_mut(id.0 as usize) {
            Some(Parameter {
                value: ParameterValue::Trigger(fired),
                ..
            }) => std::mem::replace(fired, false),
            _ => false,
        }
    }

    fn slot(&mut self, id: ParameterId) -> Option<&mut Parameter> {
        let slot = self.parameters.get_mut(id.0 as usize);
        if slot.is_none() {
            debug!("Write to unknown animation parameter {:?}", id);
        }
        slot
    }
}

impl AnimationEngine for Animator {
    fn resolve(&self, name: &str) -> Option<ParameterId> {
        self.by_name.get(name).copied()
    }

    fn set_float(&mut self, id: ParameterId, value: f32) {
        if let Some(param) = self.slot(id) {
            match &mut param.value {
                ParameterValue::Float(v) => *v = value,
                _ => debug!("Parameter '{}' is not a float", param.name),
            }
        }
    }

    fn set_float_damped(&mut self, id: ParameterId, value: f32, damp_time: f32, delta_time: f32) {
        if let Some(param) = self.slot(id) {
            match &mut param.value {
                ParameterValue::Float(v) => *v = damp(*v, value, damp_time, delta_time),
                _ => debug!("Parameter '{}' is not a float", param.name),
            }
        }
    }

    fn set_bool(&mut self, id: ParameterId, value: bool) {
        if let Some(param) = self.slot(id) {
            match &mut param.value {
                ParameterValue::Bool(v) => *v = value,
                _ => debug!("Parameter '{}' is not a bool", param.name),
            }
        }
    }

    fn trigger(&mut self, id: ParameterId) {
        if let Some(param) = self.slot(id) {
            match &mut param.value {
                ParameterValue::Trigger(fired) => *fired = true,
                _ => debug!("Parameter '{}' is not a trigger", param.name),
            }
        }
    }
}
