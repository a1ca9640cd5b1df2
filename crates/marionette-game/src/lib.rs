//! Marionette Game - Character control layer
//!
//! Routes phased input actions to movement, jump and camera capabilities and keeps an
//! animation graph in sync with the resulting locomotion state.

pub mod action;
pub mod animation;
pub mod camera;
pub mod capability;
pub mod control;
pub mod error;
pub mod input;
pub mod player;

pub use action::{ActionEvent, ActionName, ActionPhase, ActionValue};
pub use animation::{
    AnimationConfig, AnimationParameterTable, AnimationSignal, Animator, ParameterKind,
    ParameterNames, ParameterValue,
};
pub use camera::{CameraConfig, CameraController, CameraMode};
pub use capability::{
    shared, ActionEventSource, ActionHandler, AnimationEngine, Body, CameraRig, GroundSensor,
    JumpGranted, JumpSubsystem, Locomotion, ParameterId, Shared, SubscriptionId, Subscribers,
    TransformSource, Warp,
};
pub use control::{
    ControlConfig, DerivedAnimationState, DispatcherBuilder, InputDispatcher, MoveIntent,
    Positioning, SpeedMode,
};
pub use error::ControlError;
pub use input::{InputAction, InputBinding, InputBindings, InputConfig, InputHandler};
pub use player::{KinematicMotor, MovementConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;
    use winit::keyboard::{KeyCode, PhysicalKey};

    const DT: f32 = 1.0 / 60.0;

    struct Stack {
        motor: Shared<KinematicMotor>,
        camera: Shared<CameraController>,
        animator: Shared<Animator>,
        input: Shared<InputHandler>,
        dispatcher: Shared<InputDispatcher>,
        params: AnimationParameterTable,
    }

    impl Stack {
        fn new() -> Self {
            let names = ParameterNames::default();
            let motor = shared(KinematicMotor::new());
            let camera = shared(CameraController::new());
            let animator = shared(Animator::locomotion_controller(&names).unwrap());
            let input = shared(InputHandler::new());
            let dispatcher = shared(
                InputDispatcher::builder()
                    .locomotion(motor.clone())
                    .jump(motor.clone())
                    .ground(motor.clone())
                    .camera(camera.clone())
                    .animation(animator.clone())
                    .body(motor.clone())
                    .build()
                    .unwrap(),
            );
            InputDispatcher::connect(&dispatcher, input.clone());
            let params = AnimationParameterTable::resolve(&*animator.borrow(), &names).unwrap();
            Self {
                motor,
                camera,
                animator,
                input,
                dispatcher,
                params,
            }
        }

        fn key(&self, code: KeyCode, state: ElementState) {
            self.input
                .borrow_mut()
                .handle_keyboard(PhysicalKey::Code(code), state);
        }

        fn frames(&self, count: usize) -> DerivedAnimationState {
            let mut state = DerivedAnimationState::default();
            for _ in 0..count {
                let yaw = self.camera.borrow().yaw;
                self.motor.borrow_mut().fixed_update(DT, yaw);
                state = self.dispatcher.borrow_mut().sample(DT);
            }
            state
        }

        fn float(&self, signal: AnimationSignal) -> f32 {
            self.animator
                .borrow()
                .float(self.params.get(signal))
                .unwrap()
        }

        fn take_trigger(&self, signal: AnimationSignal) -> bool {
            self.animator
                .borrow_mut()
                .consume_trigger(self.params.get(signal))
        }
    }

    #[test]
    fn walk_then_sprint_drives_speed_parameter() {
        let stack = Stack::new();
        stack.key(KeyCode::KeyW, ElementState::Pressed);
        let walking = stack.frames(60);
        assert!((walking.speed - 3.0).abs() < 1e-3);
        assert!(walking.grounded);
        assert!((stack.float(AnimationSignal::Speed) - 3.0).abs() < 1e-3);
        assert!(stack.float(AnimationSignal::Forward) > 0.9);

        stack.key(KeyCode::ShiftLeft, ElementState::Pressed);
        let sprinting = stack.frames(60);
        assert!((sprinting.speed - 10.0).abs() < 1e-3);
        assert_eq!(stack.dispatcher.borrow().speed_mode(), SpeedMode::Sprinting);

        stack.key(KeyCode::ShiftLeft, ElementState::Released);
        stack.key(KeyCode::KeyW, ElementState::Released);
        let stopped = stack.frames(120);
        assert_eq!(stopped.speed, 0.0);
        assert!(stack.float(AnimationSignal::Forward).abs() < 1e-3);
    }

    #[test]
    fn jump_then_double_jump_fire_distinct_triggers() {
        let stack = Stack::new();
        stack.key(KeyCode::Space, ElementState::Pressed);
        stack.key(KeyCode::Space, ElementState::Released);
        assert!(stack.take_trigger(AnimationSignal::JumpStart));
        assert!(!stack.take_trigger(AnimationSignal::DoubleJump));

        let airborne = stack.frames(10);
        assert!(!airborne.grounded);

        stack.key(KeyCode::Space, ElementState::Pressed);
        assert!(stack.take_trigger(AnimationSignal::DoubleJump));
        assert!(!stack.take_trigger(AnimationSignal::JumpStart));
        assert!(stack.dispatcher.borrow().is_double_jump());

        let landed = stack.frames(240);
        assert!(landed.grounded);
        assert!(!stack.dispatcher.borrow().is_double_jump());
    }

    #[test]
    fn look_turns_camera_and_steering() {
        let stack = Stack::new();
        stack.input.borrow_mut().set_cursor_captured(true);
        stack
            .input
            .borrow_mut()
            .handle_mouse_motion((std::f64::consts::FRAC_PI_2 / 0.003, 0.0));
        assert!((stack.camera.borrow().yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-3);

        stack.key(KeyCode::KeyW, ElementState::Pressed);
        stack.frames(60);
        let position = stack.dispatcher.borrow().position().unwrap();
        assert!(position.x > 2.0);
        assert!(position.z.abs() < 0.1);
    }

    #[test]
    fn locked_movement_ignores_keys_but_not_jump() {
        let stack = Stack::new();
        stack.dispatcher.borrow_mut().set_move_locked(true);
        stack.key(KeyCode::KeyW, ElementState::Pressed);
        stack.key(KeyCode::Space, ElementState::Pressed);

        let state = stack.frames(30);
        assert_eq!(state.speed, 0.0);
        assert!(stack.take_trigger(AnimationSignal::JumpStart));
    }

    #[test]
    fn warp_through_dispatcher_moves_motor() {
        let stack = Stack::new();
        stack
            .dispatcher
            .borrow_mut()
            .set_position(glam::Vec3::new(4.0, 0.0, -2.0));
        assert_eq!(
            stack.motor.borrow().position(),
            glam::Vec3::new(4.0, 0.0, -2.0)
        );
    }
}
