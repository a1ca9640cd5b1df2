//! Input dispatcher: phased actions in, subsystem calls and animation parameters out

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec2, Vec3};
use tracing::{debug, info, trace, warn};

use crate::action::{ActionEvent, ActionName, ActionPhase};
use crate::animation::{AnimationParameterTable, AnimationSignal, ParameterNames};
use crate::capability::{
    ActionEventSource, AnimationEngine, Body, CameraRig, GroundSensor, JumpGranted, JumpSubsystem,
    Locomotion, Shared, SubscriptionId, Subscribers, TransformSource, Warp,
};
use crate::error::ControlError;

use super::{ControlConfig, Positioning};

/// Sprint state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    #[default]
    Walking,
    Sprinting,
}

/// Movement intent owned by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    /// Translational movement is ignored while locked
    pub move_locked: bool,
    pub speed_mode: SpeedMode,
    /// Scale pushed to the locomotion subsystem for `speed_mode`
    pub speed_scale: f32,
}

/// Per-frame snapshot pushed to the animation engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedAnimationState {
    pub speed: f32,
    pub grounded: bool,
    pub forward: f32,
    pub sideways: f32,
}

/// What a recognized action asks for
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Steer(Vec2),
    Sprint(bool),
    Jump,
    Look(Vec2),
}

impl Command {
    /// Map an event to a command. Unknown names, irrelevant phases and missing payloads
    /// map to nothing.
    fn from_event(event: &ActionEvent) -> Option<Self> {
        use ActionPhase::*;

        let name = &event.name;
        if *name == ActionName::MOVE {
            match event.phase {
                Performed | Canceled => event.value.as_vec2().map(Command::Steer),
                Started => None,
            }
        } else if *name == ActionName::SPRINT {
            match event.phase {
                Performed => Some(Command::Sprint(true)),
                Canceled => Some(Command::Sprint(false)),
                Started => None,
            }
        } else if *name == ActionName::JUMP {
            (event.phase == Started).then_some(Command::Jump)
        } else if *name == ActionName::LOOK {
            match event.phase {
                Performed => event.value.as_vec2().map(Command::Look),
                Started | Canceled => None,
            }
        } else {
            None
        }
    }
}

struct ActionLink {
    source: Shared<dyn ActionEventSource>,
    subscription: SubscriptionId,
}

/// Collects the collaborators of an [`InputDispatcher`]
#[derive(Default)]
pub struct DispatcherBuilder {
    config: ControlConfig,
    parameter_names: ParameterNames,
    locomotion: Option<Shared<dyn Locomotion>>,
    jump: Option<Shared<dyn JumpSubsystem>>,
    ground: Option<Shared<dyn GroundSensor>>,
    camera: Option<Shared<dyn CameraRig>>,
    animation: Option<Shared<dyn AnimationEngine>>,
    body: Option<Shared<dyn Body>>,
    transform: Option<Shared<dyn TransformSource>>,
    warp: Option<Shared<dyn Warp>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ControlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn parameter_names(mut self, names: ParameterNames) -> Self {
        self.parameter_names = names;
        self
    }

    pub fn locomotion(mut self, locomotion: Shared<dyn Locomotion>) -> Self {
        self.locomotion = Some(locomotion);
        self
    }

    pub fn jump(mut self, jump: Shared<dyn JumpSubsystem>) -> Self {
        self.jump = Some(jump);
        self
    }

    pub fn ground(mut self, ground: Shared<dyn GroundSensor>) -> Self {
        self.ground = Some(ground);
        self
    }

    pub fn camera(mut self, camera: Shared<dyn CameraRig>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn animation(mut self, animation: Shared<dyn AnimationEngine>) -> Self {
        self.animation = Some(animation);
        self
    }

    /// A single object offering both placement reads and warps. Takes precedence over
    /// [`transform`](Self::transform) and [`warp`](Self::warp).
    pub fn body(mut self, body: Shared<dyn Body>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn transform(mut self, transform: Shared<dyn TransformSource>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn warp(mut self, warp: Shared<dyn Warp>) -> Self {
        self.warp = Some(warp);
        self
    }

    /// Resolve capabilities and animation parameters, and subscribe to jump grants.
    ///
    /// Fails if a required capability is missing or an animation parameter does not
    /// resolve. Missing placement capabilities only degrade the dispatcher.
    pub fn build(self) -> Result<InputDispatcher, ControlError> {
        let locomotion = self
            .locomotion
            .ok_or(ControlError::MissingCapability("locomotion"))?;
        let jump = self.jump.ok_or(ControlError::MissingCapability("jump"))?;
        let ground = self.ground.ok_or(ControlError::MissingCapability("ground"))?;
        let camera = self.camera.ok_or(ControlError::MissingCapability("camera"))?;
        let animation = self
            .animation
            .ok_or(ControlError::MissingCapability("animation"))?;

        let params = AnimationParameterTable::resolve(&*animation.borrow(), &self.parameter_names)?;

        if self.body.is_some() && (self.transform.is_some() || self.warp.is_some()) {
            debug!("Combined body provided; separate transform/warp capabilities are unused");
        }
        let positioning = Positioning::resolve(self.body, self.transform, self.warp);
        if positioning.is_degraded() {
            warn!(
                "Character placement is {}; position and orientation writes will be ignored",
                positioning.describe()
            );
        }

        let jump_listeners: Shared<Subscribers<JumpGranted>> =
            Rc::new(RefCell::new(Subscribers::new()));
        let reaction = {
            let animation = animation.clone();
            let listeners = jump_listeners.clone();
            move |granted: &JumpGranted| {
                let signal = if granted.is_double_jump() {
                    AnimationSignal::DoubleJump
                } else {
                    AnimationSignal::JumpStart
                };
                debug!(
                    "Jump granted (aerial jumps: {}), triggering {}",
                    granted.aerial_jumps,
                    signal.label()
                );
                animation.borrow_mut().trigger(params.get(signal));
                listeners.borrow_mut().notify(granted);
            }
        };
        let jump_subscription = jump.borrow_mut().subscribe_granted(Box::new(reaction));

        let speed_mode = SpeedMode::Walking;
        let intent = MoveIntent {
            move_locked: self.config.start_move_locked,
            speed_mode,
            speed_scale: self.config.speed_scale(false),
        };
        locomotion.borrow_mut().set_speed_scale(intent.speed_scale);

        info!(
            "Input dispatcher ready (placement: {}, move locked: {})",
            positioning.describe(),
            intent.move_locked
        );

        Ok(InputDispatcher {
            config: self.config,
            locomotion,
            jump,
            ground,
            camera,
            animation,
            params,
            positioning,
            intent,
            jump_listeners,
            jump_subscription: Some(jump_subscription),
            action_link: None,
            last_sample: None,
        })
    }
}

/// Translates phased action events into subsystem calls and syncs derived state into
/// animation parameters once per frame.
///
/// Event handling and sampling run on the frame thread, strictly interleaved. Input
/// only writes intent (steering, speed scale, jump requests, camera deltas); sampling
/// only reads derived state.
pub struct InputDispatcher {
    config: ControlConfig,
    locomotion: Shared<dyn Locomotion>,
    jump: Shared<dyn JumpSubsystem>,
    ground: Shared<dyn GroundSensor>,
    camera: Shared<dyn CameraRig>,
    animation: Shared<dyn AnimationEngine>,
    params: AnimationParameterTable,
    positioning: Positioning,
    intent: MoveIntent,
    jump_listeners: Shared<Subscribers<JumpGranted>>,
    jump_subscription: Option<SubscriptionId>,
    action_link: Option<ActionLink>,
    last_sample: Option<DerivedAnimationState>,
}

impl InputDispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Subscribe a shared dispatcher to an action source.
    ///
    /// Replaces any previous connection. The source only holds a weak reference, so
    /// dropping the dispatcher silences it; [`disconnect`](Self::disconnect) or drop
    /// removes the subscription.
    pub fn connect(this: &Shared<InputDispatcher>, source: Shared<dyn ActionEventSource>) {
        let weak = Rc::downgrade(this);
        let subscription = source
            .borrow_mut()
            .subscribe(Box::new(move |event: &ActionEvent| {
                let Some(dispatcher) = weak.upgrade() else {
                    return;
                };
                match dispatcher.try_borrow_mut() {
                    Ok(mut dispatcher) => dispatcher.handle_action(event),
                    Err(_) => warn!("Dropped re-entrant action event '{}'", event.name),
                };
            }));

        let mut dispatcher = this.borrow_mut();
        dispatcher.disconnect();
        dispatcher.action_link = Some(ActionLink {
            source,
            subscription,
        });
    }

    /// Remove the action source subscription, if any
    pub fn disconnect(&mut self) {
        let Some(link) = self.action_link.take() else {
            return;
        };
        match link.source.try_borrow_mut() {
            Ok(mut source) => {
                source.unsubscribe(link.subscription);
            }
            Err(_) => warn!("Action source busy; subscription left in place"),
        };
    }

    pub fn is_connected(&self) -> bool {
        self.action_link.is_some()
    }

    /// Handle one action event to completion
    pub fn handle_action(&mut self, event: &ActionEvent) {
        let Some(command) = Command::from_event(event) else {
            trace!("Ignoring action '{}' ({:?})", event.name, event.phase);
            return;
        };

        match command {
            Command::Steer(input) => {
                if self.intent.move_locked {
                    trace!("Movement locked, ignoring steering {:?}", input);
                    return;
                }
                self.locomotion.borrow_mut().steer(input);
            }
            Command::Sprint(sprinting) => self.set_sprinting(sprinting),
            Command::Jump => self.jump.borrow_mut().request_jump(),
            Command::Look(delta) => self.camera.borrow_mut().rotate(delta),
        }
    }

    fn set_sprinting(&mut self, sprinting: bool) {
        let mode = if sprinting {
            SpeedMode::Sprinting
        } else {
            SpeedMode::Walking
        };
        let scale = self.config.speed_scale(sprinting);
        if mode != self.intent.speed_mode {
            debug!("Speed mode {:?} -> {:?}", self.intent.speed_mode, mode);
        }
        self.intent.speed_mode = mode;
        self.intent.speed_scale = scale;
        self.locomotion.borrow_mut().set_speed_scale(scale);
    }

    /// Per-frame sync of derived state into the animation parameters.
    ///
    /// Speed and grounded are written as-is; the local direction's forward and lateral
    /// components are damped over `delta_time`.
    pub fn sample(&mut self, delta_time: f32) -> DerivedAnimationState {
        let (speed, direction) = {
            let locomotion = self.locomotion.borrow();
            (locomotion.speed(), locomotion.local_direction())
        };
        let grounded = self.ground.borrow().is_grounded();

        let state = DerivedAnimationState {
            speed,
            grounded,
            forward: direction.z,
            sideways: direction.x,
        };

        let damp_time = self.config.direction_damp_time;
        let mut animation = self.animation.borrow_mut();
        animation.set_float(self.params.get(AnimationSignal::Speed), state.speed);
        animation.set_bool(self.params.get(AnimationSignal::IsGround), state.grounded);
        animation.set_float_damped(
            self.params.get(AnimationSignal::Forward),
            state.forward,
            damp_time,
            delta_time,
        );
        animation.set_float_damped(
            self.params.get(AnimationSignal::SideStep),
            state.sideways,
            damp_time,
            delta_time,
        );

        self.last_sample = Some(state);
        state
    }

    /// Most recent sampled snapshot
    pub fn last_sample(&self) -> Option<DerivedAnimationState> {
        self.last_sample
    }

    // ---- Move intent ----

    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    pub fn is_move_locked(&self) -> bool {
        self.intent.move_locked
    }

    /// Lock or unlock translational movement. Jump and look are unaffected.
    pub fn set_move_locked(&mut self, locked: bool) {
        if self.intent.move_locked != locked {
            debug!("Move lock {}", if locked { "enabled" } else { "disabled" });
        }
        self.intent.move_locked = locked;
    }

    pub fn speed_mode(&self) -> SpeedMode {
        self.intent.speed_mode
    }

    pub fn speed_scale(&self) -> f32 {
        self.intent.speed_scale
    }

    // ---- Derived state ----

    pub fn speed(&self) -> f32 {
        self.locomotion.borrow().speed()
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.borrow().is_grounded()
    }

    pub fn local_direction(&self) -> Vec3 {
        self.locomotion.borrow().local_direction()
    }

    pub fn aerial_jumps(&self) -> u32 {
        self.jump.borrow().aerial_jumps()
    }

    /// Whether the character is in an aerial (second or later) jump
    pub fn is_double_jump(&self) -> bool {
        self.aerial_jumps() >= 1
    }

    // ---- Placement ----

    pub fn positioning(&self) -> &Positioning {
        &self.positioning
    }

    /// World position, if a transform capability is available
    pub fn position(&self) -> Option<Vec3> {
        self.positioning.position()
    }

    /// Warp to a position. Does nothing without a warp capability.
    pub fn set_position(&mut self, position: Vec3) {
        if !self.positioning.warp_position(position) {
            trace!("No warp capability, position write ignored");
        }
    }

    /// World orientation, if a transform capability is available
    pub fn orientation(&self) -> Option<Quat> {
        self.positioning.orientation()
    }

    /// Warp to an orientation. Does nothing without a warp capability.
    pub fn set_orientation(&mut self, orientation: Quat) {
        if !self.positioning.warp_orientation(orientation) {
            trace!("No warp capability, orientation write ignored");
        }
    }

    // ---- Jump fan-out ----

    /// Subscribe to granted jumps. Listeners run after the animation transition fires
    /// and must not call back into the jump subsystem.
    pub fn on_jump(&mut self, listener: Box<dyn FnMut(&JumpGranted)>) -> SubscriptionId {
        self.jump_listeners.borrow_mut().add(listener)
    }

    pub fn remove_jump_listener(&mut self, id: SubscriptionId) -> bool {
        self.jump_listeners.borrow_mut().remove(id)
    }
}

impl Drop for InputDispatcher {
    fn drop(&mut self) {
        self.disconnect();
        if let Some(id) = self.jump_subscription.take() {
            match self.jump.try_borrow_mut() {
                Ok(mut jump) => {
                    jump.unsubscribe_granted(id);
                }
                Err(_) => warn!("Jump subsystem busy; grant subscription left in place"),
            }
        }
    }
}
