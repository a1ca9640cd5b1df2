//! Camera controller with mouse look and zoom

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::capability::CameraRig;

use super::CameraConfig;

/// Camera mode (first-person or third-person)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Camera at the eye position
    FirstPerson,
    /// Camera orbiting at a distance
    ThirdPerson { distance: f32 },
}

impl CameraMode {
    /// Get the camera distance (0 for first-person)
    pub fn distance(&self) -> f32 {
        match self {
            CameraMode::FirstPerson => 0.0,
            CameraMode::ThirdPerson { distance } => *distance,
        }
    }

    pub fn is_first_person(&self) -> bool {
        matches!(self, CameraMode::FirstPerson)
    }
}

/// Orbit camera following a character's eye position
#[derive(Debug, Clone)]
pub struct CameraController {
    pub config: CameraConfig,
    pub mode: CameraMode,
    /// Yaw rotation in radians (horizontal)
    pub yaw: f32,
    /// Pitch rotation in radians (vertical)
    pub pitch: f32,
    target_distance: f32,
    current_distance: f32,
    /// Camera world position (computed each update)
    position: Vec3,
    /// Point the camera looks at
    target: Vec3,
}

impl CameraController {
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    pub fn with_config(config: CameraConfig) -> Self {
        let distance = config
            .default_distance
            .clamp(config.min_distance, config.max_distance);
        Self {
            config,
            mode: CameraMode::ThirdPerson { distance },
            yaw: 0.0,
            pitch: 0.0,
            target_distance: distance,
            current_distance: distance,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Current interpolated follow distance
    pub fn distance(&self) -> f32 {
        self.current_distance
    }

    /// Get the camera's forward direction
    pub fn forward(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            -self.yaw.cos() * cos_pitch,
        )
    }

    /// Get the camera's right direction
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Apply a look delta
    pub fn handle_mouse_look(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.config.sensitivity;
        self.set_pitch(self.pitch - delta.y * self.config.sensitivity);
    }

    /// Handle scroll wheel zoom
    pub fn handle_zoom(&mut self, scroll_delta: f32) {
        self.target_distance = (self.target_distance - scroll_delta * self.config.zoom_speed)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Follow the eye position (call each frame)
    pub fn update(&mut self, eye_position: Vec3, dt: f32) {
        let zoom_lerp = 1.0 - (1.0 - self.config.zoom_smoothing).powf(dt * 60.0);
        self.current_distance += (self.target_distance - self.current_distance) * zoom_lerp;

        if self.current_distance < self.config.fps_threshold {
            self.mode = CameraMode::FirstPerson;
            self.current_distance = 0.0;
            self.target_distance = 0.0;
        } else {
            self.mode = CameraMode::ThirdPerson {
                distance: self.current_distance,
            };
        }

        self.target = eye_position;
        self.position = match self.mode {
            CameraMode::FirstPerson => eye_position,
            CameraMode::ThirdPerson { distance } => {
                let shoulder = self.right() * self.config.shoulder_offset;
                eye_position + shoulder - self.forward() * distance
            }
        };
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Set the pitch, clamped to the configured range
    pub fn set_pitch(&mut self, pitch: f32) {
        let pitch_min = self.config.pitch_min.to_radians();
        let pitch_max = self.config.pitch_max.to_radians();
        self.pitch = pitch.clamp(pitch_min, pitch_max);
    }

    /// Set the zoom distance directly, without interpolation
    pub fn set_distance(&mut self, distance: f32) {
        let clamped = distance.clamp(self.config.min_distance, self.config.max_distance);
        self.target_distance = clamped;
        self.current_distance = clamped;

        self.mode = if clamped < self.config.fps_threshold {
            CameraMode::FirstPerson
        } else {
            CameraMode::ThirdPerson { distance: clamped }
        };
        debug!("Camera mode {:?}", self.mode);
    }

    /// Toggle between first and third person
    pub fn toggle_perspective(&mut self) {
        match self.mode {
            CameraMode::FirstPerson => self.set_distance(self.config.default_distance),
            CameraMode::ThirdPerson { .. } => self.set_distance(0.0),
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig for CameraController {
    fn rotate(&mut self, delta: Vec2) {
        self.handle_mouse_look(delta);
    }
}
