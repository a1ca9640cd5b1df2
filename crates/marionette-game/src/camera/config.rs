//! Camera configuration

use serde::{Deserialize, Serialize};

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Minimum camera distance (0 = first person)
    pub min_distance: f32,
    /// Maximum camera distance for third person
    pub max_distance: f32,
    /// Distance used when switching to third person
    pub default_distance: f32,
    /// Distance below which the camera snaps to first person
    pub fps_threshold: f32,
    /// Distance change per scroll step
    pub zoom_speed: f32,
    /// Zoom interpolation smoothing (0-1, lower = smoother)
    pub zoom_smoothing: f32,
    /// Look sensitivity (radians per unit of look delta)
    pub sensitivity: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
    /// Horizontal offset in third person (shoulder view)
    pub shoulder_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: 20.0,
            default_distance: 5.0,
            fps_threshold: 0.5,
            zoom_speed: 2.0,
            zoom_smoothing: 0.15,
            sensitivity: 0.003,
            pitch_min: -89.0,
            pitch_max: 89.0,
            shoulder_offset: 0.3,
        }
    }
}
