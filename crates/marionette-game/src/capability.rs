//! Capability interfaces consumed by the control layer
//!
//! Each collaborator (motor, jump integrator, ground probe, camera rig, animation
//! engine, input source) is reached only through one of these narrow traits. Everything
//! runs on the frame thread, so collaborators are shared as [`Shared`] handles and
//! notifications are plain boxed callbacks invoked synchronously.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec2, Vec3};

use crate::action::ActionEvent;

/// Single-threaded shared handle to a collaborator
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Handle returned by `subscribe` calls, used to unsubscribe on teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of callbacks for one notification.
///
/// Callbacks are invoked synchronously, in subscription order. A callback must not
/// re-enter the object that owns the list while it is being notified.
pub struct Subscribers<E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn FnMut(&E)>)>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a callback
    pub fn add(&mut self, callback: Box<dyn FnMut(&E)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove a callback. Returns false if the id was unknown.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Invoke every callback with the event
    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// Read access to a world placement
pub trait TransformSource {
    fn position(&self) -> Vec3;
    fn orientation(&self) -> Quat;
}

/// Instantaneous placement that bypasses physics interpolation
pub trait Warp {
    fn warp_position(&mut self, position: Vec3);
    fn warp_orientation(&mut self, orientation: Quat);
}

/// A single object offering both read and warp access to its placement
pub trait Body: TransformSource + Warp {}

impl<T: TransformSource + Warp + ?Sized> Body for T {}

/// The movement solver driving the character
pub trait Locomotion {
    /// Set the 2D steering input (x = strafe, y = forward)
    fn steer(&mut self, input: Vec2);
    /// Current scalar speed
    fn speed(&self) -> f32;
    /// Current movement direction in character space, laid out `(lateral, vertical, forward)`
    fn local_direction(&self) -> Vec3;
    fn speed_scale(&self) -> f32;
    fn set_speed_scale(&mut self, scale: f32);
}

/// Notification that a jump request was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpGranted {
    /// Aerial jumps performed since the last ground contact, including this one
    pub aerial_jumps: u32,
}

impl JumpGranted {
    pub fn is_double_jump(&self) -> bool {
        self.aerial_jumps >= 1
    }
}

/// The jump integrator. Owns grounding, cooldown and aerial-jump policy.
pub trait JumpSubsystem {
    /// Ask for a jump. Accepted requests fire the granted notification before returning.
    fn request_jump(&mut self);
    /// Aerial jumps performed since the last ground contact
    fn aerial_jumps(&self) -> u32;
    /// Subscribe to granted notifications.
    ///
    /// The callback runs while the subsystem is mutably borrowed and must not call back
    /// into it; everything it needs is carried by [`JumpGranted`].
    fn subscribe_granted(&mut self, callback: Box<dyn FnMut(&JumpGranted)>) -> SubscriptionId;
    fn unsubscribe_granted(&mut self, id: SubscriptionId) -> bool;
}

/// Ground contact probe
pub trait GroundSensor {
    fn is_grounded(&self) -> bool;
}

/// The camera rig
pub trait CameraRig {
    /// Apply a 2D rotation delta (x = yaw, y = pitch)
    fn rotate(&mut self, delta: Vec2);
}

/// Opaque animation parameter handle issued by an [`AnimationEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterId(pub u32);

/// The animation graph runtime
pub trait AnimationEngine {
    /// Resolve a parameter name to a handle
    fn resolve(&self, name: &str) -> Option<ParameterId>;
    fn set_float(&mut self, id: ParameterId, value: f32);
    /// Move a float toward `value`, smoothed over `damp_time` given `delta_time`
    fn set_float_damped(&mut self, id: ParameterId, value: f32, damp_time: f32, delta_time: f32);
    fn set_bool(&mut self, id: ParameterId, value: bool);
    /// Fire a one-shot transition
    fn trigger(&mut self, id: ParameterId);
}

/// Callback receiving triggered actions
pub type ActionHandler = Box<dyn FnMut(&ActionEvent)>;

/// Producer of phased action events
pub trait ActionEventSource {
    /// Subscribe a handler. Events are delivered synchronously in arrival order.
    fn subscribe(&mut self, handler: ActionHandler) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
