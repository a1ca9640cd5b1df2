//! Control layer tunables

use serde::{Deserialize, Serialize};

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Locomotion speed scale while walking
    pub walk_speed_scale: f32,
    /// Locomotion speed scale while sprint is held
    pub sprint_speed_scale: f32,
    /// Damping time constant for the Forward/SideStep animation parameters
    pub direction_damp_time: f32,
    /// Whether translational movement starts locked
    pub start_move_locked: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            walk_speed_scale: 1.2,
            sprint_speed_scale: 4.0,
            direction_damp_time: 0.1,
            start_move_locked: false,
        }
    }
}

impl ControlConfig {
    /// Speed scale for a sprint state
    pub fn speed_scale(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.sprint_speed_scale
        } else {
            self.walk_speed_scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scales() {
        let config = ControlConfig::default();
        assert_eq!(config.speed_scale(true), 4.0);
        assert_eq!(config.speed_scale(false), 1.2);
        assert_eq!(config.direction_damp_time, 0.1);
        assert!(!config.start_move_locked);
    }
}
