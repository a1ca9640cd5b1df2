//! Recording collaborators for control-layer tests

use glam::{Quat, Vec2, Vec3};
use marionette_core::Transform;

use crate::capability::{
    ActionEventSource, ActionHandler, AnimationEngine, CameraRig, GroundSensor, JumpGranted,
    JumpSubsystem, Locomotion, ParameterId, SubscriptionId, Subscribers, TransformSource, Warp,
};
use crate::action::ActionEvent;

#[derive(Debug, Default)]
pub struct FakeBody {
    pub transform: Transform,
    pub warps: usize,
}

impl FakeBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            warps: 0,
        }
    }
}

impl TransformSource for FakeBody {
    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn orientation(&self) -> Quat {
        self.transform.rotation
    }
}

impl Warp for FakeBody {
    fn warp_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.warps += 1;
    }

    fn warp_orientation(&mut self, orientation: Quat) {
        self.transform.rotation = orientation;
        self.warps += 1;
    }
}

#[derive(Debug)]
pub struct FakeLocomotion {
    pub steering: Vec<Vec2>,
    pub speed: f32,
    pub direction: Vec3,
    pub speed_scale: f32,
    pub scale_writes: Vec<f32>,
}

impl Default for FakeLocomotion {
    fn default() -> Self {
        Self {
            steering: Vec::new(),
            speed: 0.0,
            direction: Vec3::ZERO,
            speed_scale: 1.0,
            scale_writes: Vec::new(),
        }
    }
}

impl Locomotion for FakeLocomotion {
    fn steer(&mut self, input: Vec2) {
        self.steering.push(input);
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn local_direction(&self) -> Vec3 {
        self.direction
    }

    fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    fn set_speed_scale(&mut self, scale: f32) {
        self.speed_scale = scale;
        self.scale_writes.push(scale);
    }
}

/// Jump subsystem granting every request, counting aerial jumps while airborne
#[derive(Debug, Default)]
pub struct FakeJump {
    pub requests: usize,
    pub airborne: bool,
    pub aerial_jumps: u32,
    pub reject: bool,
    pub granted: Subscribers<JumpGranted>,
}

impl JumpSubsystem for FakeJump {
    fn request_jump(&mut self) {
        self.requests += 1;
        if self.reject {
            return;
        }
        if self.airborne {
            self.aerial_jumps += 1;
        } else {
            self.airborne = true;
            self.aerial_jumps = 0;
        }
        let event = JumpGranted {
            aerial_jumps: self.aerial_jumps,
        };
        self.granted.notify(&event);
    }

    fn aerial_jumps(&self) -> u32 {
        self.aerial_jumps
    }

    fn subscribe_granted(&mut self, callback: Box<dyn FnMut(&JumpGranted)>) -> SubscriptionId {
        self.granted.add(callback)
    }

    fn unsubscribe_granted(&mut self, id: SubscriptionId) -> bool {
        self.granted.remove(id)
    }
}

#[derive(Debug, Default)]
pub struct FakeGround {
    pub grounded: bool,
}

impl GroundSensor for FakeGround {
    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

#[derive(Debug, Default)]
pub struct FakeCamera {
    pub deltas: Vec<Vec2>,
}

impl CameraRig for FakeCamera {
    fn rotate(&mut self, delta: Vec2) {
        self.deltas.push(delta);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimWrite {
    Float(ParameterId, f32),
    Damped(ParameterId, f32, f32, f32),
    Bool(ParameterId, bool),
    Trigger(ParameterId),
}

/// Animation engine that resolves a fixed name list and records every write
#[derive(Debug, Default)]
pub struct RecordingAnimation {
    pub names: Vec<String>,
    pub writes: Vec<AnimWrite>,
}

impl RecordingAnimation {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            writes: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        Self::with_names(&["Speed", "IsGround", "Forward", "SideStep", "JumpStart", "DoubleJump"])
    }

    pub fn id(&self, name: &str) -> ParameterId {
        self.resolve(name).expect("declared parameter")
    }

    pub fn triggers(&self) -> Vec<ParameterId> {
        self.writes
            .iter()
            .filter_map(|w| match w {
                AnimWrite::Trigger(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl AnimationEngine for RecordingAnimation {
    fn resolve(&self, name: &str) -> Option<ParameterId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| ParameterId(i as u32))
    }

    fn set_float(&mut self, id: ParameterId, value: f32) {
        self.writes.push(AnimWrite::Float(id, value));
    }

    fn set_float_damped(&mut self, id: ParameterId, value: f32, damp_time: f32, delta_time: f32) {
        self.writes
            .push(AnimWrite::Damped(id, value, damp_time, delta_time));
    }

    fn set_bool(&mut self, id: ParameterId, value: bool) {
        self.writes.push(AnimWrite::Bool(id, value));
    }

    fn trigger(&mut self, id: ParameterId) {
        self.writes.push(AnimWrite::Trigger(id));
    }
}

#[derive(Debug, Default)]
pub struct FakeSource {
    pub handlers: Subscribers<ActionEvent>,
}

impl FakeSource {
    pub fn emit(&mut self, event: ActionEvent) {
        self.handlers.notify(&event);
    }
}

impl ActionEventSource for FakeSource {
    fn subscribe(&mut self, handler: ActionHandler) -> SubscriptionId {
        self.handlers.add(handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(id)
    }
}
