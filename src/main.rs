//! Marionette - headless character control demo
//!
//! Wires the kinematic motor, camera rig and animator behind an input dispatcher, then
//! replays a scripted keyboard/mouse timeline through the fixed-step loop and logs the
//! animation state the dispatcher derives.

mod settings;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use marionette_core::{GameTime, Transform, Vec3};
use marionette_game::{
    shared, AnimationParameterTable, AnimationSignal, Animator, CameraController, InputDispatcher,
    InputHandler, JumpGranted, KinematicMotor, Shared,
};

use settings::GameSettings;

const FRAME_DT: f32 = 1.0 / 60.0;
const LOG_EVERY: u64 = 15;

/// One step of the replayed input
#[derive(Debug, Clone, Copy)]
enum Scripted {
    Press(KeyCode),
    Release(KeyCode),
    Look(f64, f64),
    Zoom(f32),
    LockMovement(bool),
}

fn timeline() -> Vec<(f32, Scripted)> {
    use Scripted::*;
    vec![
        (0.2, Press(KeyCode::KeyW)),
        (0.8, Press(KeyCode::ShiftLeft)),
        (1.6, Press(KeyCode::Space)),
        (1.7, Release(KeyCode::Space)),
        (1.9, Press(KeyCode::Space)),
        (2.0, Release(KeyCode::Space)),
        (2.4, Release(KeyCode::ShiftLeft)),
        (2.6, Press(KeyCode::KeyD)),
        (2.7, Look(120.0, -20.0)),
        (2.8, Zoom(1.0)),
        (3.0, LockMovement(true)),
        (3.2, Release(KeyCode::KeyW)),
        (3.5, LockMovement(false)),
        (3.6, Release(KeyCode::KeyD)),
    ]
}

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| Level::INFO.to_string());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Marionette demo...");

    let settings = GameSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to save settings")?;
    }

    let motor = shared(KinematicMotor::with_config(settings.movement.clone()));
    let camera = shared(CameraController::with_config(settings.camera.clone()));
    let animator = shared(
        Animator::locomotion_controller(&settings.animation.parameters)
            .context("Failed to build the animator")?,
    );
    let input = shared(InputHandler::with_config(
        Default::default(),
        settings.input.clone(),
    ));

    let dispatcher = shared(
        InputDispatcher::builder()
            .config(settings.controls.clone())
            .parameter_names(settings.animation.parameters.clone())
            .locomotion(motor.clone())
            .jump(motor.clone())
            .ground(motor.clone())
            .camera(camera.clone())
            .animation(animator.clone())
            .body(motor.clone())
            .build()
            .context("Failed to build the input dispatcher")?,
    );
    InputDispatcher::connect(&dispatcher, input.clone());
    input.borrow_mut().set_cursor_captured(true);

    {
        let mut dispatcher = dispatcher.borrow_mut();
        dispatcher.set_position(Vec3::new(0.0, settings.movement.ground_height, 0.0));
        dispatcher.on_jump(Box::new(|granted: &JumpGranted| {
            info!(
                "Jump granted ({})",
                if granted.is_double_jump() { "double" } else { "first" }
            );
        }));
    }

    let params = AnimationParameterTable::resolve(&*animator.borrow(), &settings.animation.parameters)
        .context("Failed to resolve animation parameters")?;

    let mut time = GameTime::new(settings.time.clone());
    let mut script = timeline().into_iter().peekable();
    let end_time = 4.5;
    let mut previous = motor.borrow().transform();

    while time.total_time < end_time {
        let now = time.total_time as f32;
        while let Some((_, step)) = script.next_if(|(at, _)| *at <= now) {
            apply(step, &input, &camera, &dispatcher);
        }

        time.update(FRAME_DT);
        let yaw = camera.borrow().yaw;
        for _ in 0..time.fixed_steps() {
            previous = motor.borrow().transform();
            motor.borrow_mut().fixed_update(time.config.fixed_timestep, yaw);
        }
        let rendered = Transform::lerp(
            &previous,
            &motor.borrow().transform(),
            time.fixed_interpolation(),
        );
        let eye = rendered.position + Vec3::Y * settings.movement.eye_height;
        camera.borrow_mut().update(eye, time.delta_time);

        let state = dispatcher.borrow_mut().sample(time.delta_time);

        for signal in [AnimationSignal::JumpStart, AnimationSignal::DoubleJump] {
            if animator.borrow_mut().consume_trigger(params.get(signal)) {
                info!("Animation trigger {}", signal.label());
            }
        }

        if time.frame_count % LOG_EVERY == 0 {
            let position = rendered.position;
            info!(
                "t={:.2}s pos=({:.2}, {:.2}, {:.2}) speed={:.2} grounded={} forward={:.2} side={:.2}",
                time.total_time,
                position.x,
                position.y,
                position.z,
                state.speed,
                state.grounded,
                state.forward,
                state.sideways,
            );
        }
    }

    info!("Demo finished after {} frames", time.frame_count);
    Ok(())
}

fn apply(
    step: Scripted,
    input: &Shared<InputHandler>,
    camera: &Shared<CameraController>,
    dispatcher: &Shared<InputDispatcher>,
) {
    match step {
        Scripted::Press(key) => input
            .borrow_mut()
            .handle_keyboard(PhysicalKey::Code(key), ElementState::Pressed),
        Scripted::Release(key) => input
            .borrow_mut()
            .handle_keyboard(PhysicalKey::Code(key), ElementState::Released),
        Scripted::Look(dx, dy) => input.borrow_mut().handle_mouse_motion((dx, dy)),
        Scripted::Zoom(delta) => camera.borrow_mut().handle_zoom(delta),
        Scripted::LockMovement(locked) => {
            info!("Movement {}", if locked { "locked" } else { "unlocked" });
            dispatcher.borrow_mut().set_move_locked(locked);
        }
    }
}
