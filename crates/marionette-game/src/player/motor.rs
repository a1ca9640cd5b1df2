//! Kinematic character motor on a flat ground plane

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};
use marionette_core::Transform;
use tracing::debug;

use crate::capability::{
    GroundSensor, JumpGranted, JumpSubsystem, Locomotion, SubscriptionId, Subscribers,
    TransformSource, Warp,
};

use super::MovementConfig;

/// Character motor integrating steering, jumps and gravity.
///
/// Steering is relative to the camera yaw passed to [`KinematicMotor::fixed_update`]. The
/// character turns towards that heading while moving, so sideways input strafes.
#[derive(Debug)]
pub struct KinematicMotor {
    pub config: MovementConfig,
    transform: Transform,
    /// Facing yaw in radians, kept in sync with `transform.rotation`
    facing_yaw: f32,
    steering: Vec2,
    speed_scale: f32,
    /// Horizontal velocity (X, Z only)
    horizontal_velocity: Vec3,
    vertical_velocity: f32,
    grounded: bool,
    /// Time since last grounded (for coyote time)
    time_since_grounded: f32,
    /// Jumps granted since the first jump off the ground
    aerial_jumps: u32,
    granted: Subscribers<JumpGranted>,
}

impl KinematicMotor {
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default())
    }

    pub fn with_config(config: MovementConfig) -> Self {
        let ground = Vec3::new(0.0, config.ground_height, 0.0);
        Self {
            config,
            transform: Transform::from_position(ground),
            facing_yaw: 0.0,
            steering: Vec2::ZERO,
            speed_scale: 1.0,
            horizontal_velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            grounded: true,
            time_since_grounded: 0.0,
            aerial_jumps: 0,
            granted: Subscribers::new(),
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Full velocity including the vertical component
    pub fn velocity(&self) -> Vec3 {
        self.horizontal_velocity + Vec3::Y * self.vertical_velocity
    }

    /// Whether a jump from the ground is still allowed (grounded or within coyote time)
    pub fn can_jump(&self) -> bool {
        self.grounded || self.time_since_grounded < self.config.coyote_time
    }

    /// Advance the motor by one fixed step
    pub fn fixed_update(&mut self, dt: f32, camera_yaw: f32) {
        let grounded = self.grounded;

        let move_dir = Self::camera_relative(self.steering, camera_yaw);
        let max_speed = self.config.max_speed(self.speed_scale);

        if move_dir.length_squared() > 0.0 {
            let target_velocity = move_dir * max_speed;
            let accel = self.config.acceleration(grounded);
            self.horizontal_velocity =
                Self::move_towards_vec3(self.horizontal_velocity, target_velocity, accel * dt);
            self.turn_towards(camera_yaw, dt);
        } else {
            let decel = self.config.deceleration(grounded);
            self.horizontal_velocity =
                Self::move_towards_vec3(self.horizontal_velocity, Vec3::ZERO, decel * dt);
        }

        if !grounded {
            self.vertical_velocity -= self.config.gravity() * dt;
        }

        self.transform.position += self.velocity() * dt;
        self.settle();

        if self.grounded {
            self.time_since_grounded = 0.0;
        } else {
            self.time_since_grounded += dt;
        }
    }

    /// Snap to the ground plane when at or below it and not rising
    fn settle(&mut self) {
        let ground = self.config.ground_height;
        let on_ground = self.transform.position.y <= ground && self.vertical_velocity <= 0.0;
        if on_ground {
            self.transform.position.y = ground;
            self.vertical_velocity = 0.0;
            if !self.grounded {
                debug!("Landed after {} aerial jumps", self.aerial_jumps);
            }
            self.aerial_jumps = 0;
        }
        self.grounded = on_ground;
    }

    /// Rotate a steering vector `(lateral, forward)` into a world direction on the XZ plane
    fn camera_relative(steering: Vec2, camera_yaw: f32) -> Vec3 {
        let steering = steering.clamp_length_max(1.0);
        if steering.length_squared() == 0.0 {
            return Vec3::ZERO;
        }
        let (sin_yaw, cos_yaw) = camera_yaw.sin_cos();
        let forward = Vec3::new(sin_yaw, 0.0, -cos_yaw);
        let right = Vec3::new(cos_yaw, 0.0, sin_yaw);
        right * steering.x + forward * steering.y
    }

    fn turn_towards(&mut self, yaw: f32, dt: f32) {
        let diff = (yaw - self.facing_yaw + PI).rem_euclid(TAU) - PI;
        let step = self.config.turn_speed * dt;
        self.facing_yaw += diff.clamp(-step, step);
        self.transform.rotation = Quat::from_rotation_y(-self.facing_yaw);
    }

    /// Move a vector towards a target by a maximum delta
    fn move_towards_vec3(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
        let diff = target - current;
        let distance = diff.length();

        if distance <= max_delta || distance == 0.0 {
            target
        } else {
            current + diff / distance * max_delta
        }
    }

    fn grant(&mut self, velocity: f32) {
        self.vertical_velocity = velocity;
        self.grounded = false;
        let event = JumpGranted {
            aerial_jumps: self.aerial_jumps,
        };
        debug!("Jump granted (aerial jumps: {})", event.aerial_jumps);
        self.granted.notify(&event);
    }
}

impl Default for KinematicMotor {
    fn default() -> Self {
        Self::new()
    }
}

impl Locomotion for KinematicMotor {
    fn steer(&mut self, input: Vec2) {
        self.steering = input;
    }

    fn speed(&self) -> f32 {
        self.horizontal_velocity.length()
    }

    fn local_direction(&self) -> Vec3 {
        let max_speed = self.config.max_speed(self.speed_scale);
        if max_speed <= 0.0 {
            return Vec3::ZERO;
        }
        self.transform
            .to_local_direction(self.horizontal_velocity / max_speed)
            .clamp_length_max(1.0)
    }

    fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    fn set_speed_scale(&mut self, scale: f32) {
        self.speed_scale = scale.max(0.0);
    }
}

impl JumpSubsystem for KinematicMotor {
    fn request_jump(&mut self) {
        if self.can_jump() {
            self.aerial_jumps = 0;
            // Consume coyote time
            self.time_since_grounded = self.config.coyote_time;
            self.grant(self.config.jump_velocity);
        } else if self.aerial_jumps < self.config.max_aerial_jumps {
            self.aerial_jumps += 1;
            self.grant(self.config.air_jump_velocity);
        } else {
            debug!("Jump rejected: no aerial jumps left");
        }
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

impl GroundSensor for KinematicMotor {
    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

impl TransformSource for KinematicMotor {
    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn orientation(&self) -> Quat {
        self.transform.rotation
    }
}

impl Warp for KinematicMotor {
    fn warp_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.horizontal_velocity = Vec3::ZERO;
        self.vertical_velocity = 0.0;
        self.grounded = position.y <= self.config.ground_height;
        if self.grounded {
            self.transform.position.y = self.config.ground_height;
            self.aerial_jumps = 0;
            self.time_since_grounded = 0.0;
        }
    }

    fn warp_orientation(&mut self, orientation: Quat) {
        let forward = orientation * -Vec3::Z;
        self.facing_yaw = forward.x.atan2(-forward.z);
        self.transform.rotation = orientation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    fn run(motor: &mut KinematicMotor, seconds: f32, yaw: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            motor.fixed_update(DT, yaw);
        }
    }

    #[test]
    fn test_move_towards() {
        let result =
            KinematicMotor::move_towards_vec3(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 5.0);
        assert!((result.x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_reaches_scaled_speed() {
        let mut motor = KinematicMotor::new();
        motor.set_speed_scale(1.2);
        motor.steer(Vec2::new(0.0, 1.0));
        run(&mut motor, 1.0, 0.0);

        assert!((motor.speed() - 3.0).abs() < 1e-3);
        assert!(motor.position().z < 0.0);

        motor.set_speed_scale(4.0);
        run(&mut motor, 1.0, 0.0);
        assert!((motor.speed() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_steering_follows_camera_yaw() {
        let mut motor = KinematicMotor::new();
        motor.steer(Vec2::new(0.0, 1.0));
        run(&mut motor, 1.0, std::f32::consts::FRAC_PI_2);

        // Camera yawed right: forward is +X
        assert!(motor.position().x > 1.0);
        assert!(motor.position().z.abs() < 1e-3);
        assert!((motor.transform().forward() - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_local_direction_reports_strafe() {
        let mut motor = KinematicMotor::new();
        motor.steer(Vec2::new(1.0, 0.0));
        run(&mut motor, 1.0, 0.0);

        let local = motor.local_direction();
        assert!((local.x - 1.0).abs() < 1e-3);
        assert!(local.z.abs() < 1e-3);
    }

    #[test]
    fn test_decelerates_without_input() {
        let mut motor = KinematicMotor::new();
        motor.steer(Vec2::new(0.0, 1.0));
        run(&mut motor, 0.5, 0.0);
        motor.steer(Vec2::ZERO);
        run(&mut motor, 1.0, 0.0);
        assert_eq!(motor.speed(), 0.0);
        assert_eq!(motor.local_direction(), Vec3::ZERO);
    }

    #[test]
    fn test_jump_and_land() {
        let mut motor = KinematicMotor::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        motor.subscribe_granted(Box::new(move |granted: &JumpGranted| {
            log.borrow_mut().push(granted.aerial_jumps)
        }));

        motor.request_jump();
        assert!(!motor.is_grounded());
        motor.fixed_update(DT, 0.0);
        assert!(motor.position().y > 0.0);

        run(&mut motor, 3.0, 0.0);
        assert!(motor.is_grounded());
        assert_eq!(motor.position().y, 0.0);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn test_limited_aerial_jumps() {
        let mut motor = KinematicMotor::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        motor.subscribe_granted(Box::new(move |granted: &JumpGranted| {
            log.borrow_mut().push(granted.aerial_jumps)
        }));

        motor.request_jump();
        run(&mut motor, 0.2, 0.0);
        motor.request_jump();
        assert_eq!(motor.aerial_jumps(), 1);
        motor.request_jump();
        assert_eq!(motor.aerial_jumps(), 1);
        assert_eq!(*seen.borrow(), vec![0, 1]);

        run(&mut motor, 4.0, 0.0);
        assert!(motor.is_grounded());
        assert_eq!(motor.aerial_jumps(), 0);
    }

    #[test]
    fn test_coyote_time_after_warp_above_ground() {
        let mut motor = KinematicMotor::new();
        motor.warp_position(Vec3::new(0.0, 5.0, 0.0));
        assert!(!motor.is_grounded());

        motor.fixed_update(DT, 0.0);
        assert!(motor.can_jump());
        run(&mut motor, 0.2, 0.0);
        assert!(!motor.can_jump());
    }

    #[test]
    fn test_warp_resets_velocity() {
        let mut motor = KinematicMotor::new();
        motor.steer(Vec2::new(0.0, 1.0));
        run(&mut motor, 0.5, 0.0);
        motor.warp_position(Vec3::new(3.0, -1.0, 2.0));

        assert_eq!(motor.speed(), 0.0);
        assert_eq!(motor.position(), Vec3::new(3.0, 0.0, 2.0));
        assert!(motor.is_grounded());
    }

    #[test]
    fn test_warp_orientation_sets_facing() {
        let mut motor = KinematicMotor::new();
        let orientation = Quat::from_rotation_y(-0.5);
        motor.warp_orientation(orientation);
        assert!((motor.facing_yaw - 0.5).abs() < 1e-4);
        assert_eq!(motor.orientation(), orientation);
    }
}
