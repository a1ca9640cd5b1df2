//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Standard gravity in m/s²
pub const GRAVITY: f32 = 9.81;

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Base speed in meters per second, multiplied by the locomotion speed scale
    pub walk_speed: f32,
    /// Ground acceleration (how fast you reach max speed)
    pub ground_acceleration: f32,
    /// Ground deceleration (how fast you stop)
    pub ground_deceleration: f32,
    /// Air acceleration (reduced control in air)
    pub air_acceleration: f32,
    /// Air deceleration
    pub air_deceleration: f32,
    /// Jump initial velocity
    pub jump_velocity: f32,
    /// Initial velocity of a jump started in the air
    pub air_jump_velocity: f32,
    /// Jumps allowed between leaving the ground and landing again
    pub max_aerial_jumps: u32,
    /// Gravity multiplier (1.0 = normal gravity)
    pub gravity_scale: f32,
    /// Coyote time - grace period after leaving ground where you can still jump
    pub coyote_time: f32,
    /// Height of the ground plane
    pub ground_height: f32,
    /// Eye height above the feet
    pub eye_height: f32,
    /// Turn rate towards the camera heading, in radians per second
    pub turn_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.5,
            ground_acceleration: 50.0,
            ground_deceleration: 30.0,
            air_acceleration: 10.0,
            air_deceleration: 5.0,
            jump_velocity: 8.0,
            air_jump_velocity: 7.0,
            max_aerial_jumps: 1,
            gravity_scale: 1.0,
            coyote_time: 0.15,
            ground_height: 0.0,
            eye_height: 1.7,
            turn_speed: 12.0,
        }
    }
}

impl MovementConfig {
    /// Max horizontal speed for a locomotion speed scale
    pub fn max_speed(&self, speed_scale: f32) -> f32 {
        self.walk_speed * speed_scale
    }

    /// Get the current acceleration based on grounded state
    pub fn acceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_acceleration
        } else {
            self.air_acceleration
        }
    }

    /// Get the current deceleration based on grounded state
    pub fn deceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_deceleration
        } else {
            self.air_deceleration
        }
    }

    pub fn gravity(&self) -> f32 {
        GRAVITY * self.gravity_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_from_scale() {
        let config = MovementConfig::default();
        assert_eq!(config.max_speed(1.2), 3.0);
        assert_eq!(config.max_speed(4.0), 10.0);
    }

    #[test]
    fn test_air_control_is_weaker() {
        let config = MovementConfig::default();
        assert!(config.acceleration(false) < config.acceleration(true));
        assert!(config.deceleration(false) < config.deceleration(true));
    }
}
