//! Core types used throughout the control stack

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World placement of a character: position and orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform facing along a yaw angle (radians, around +Y)
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(-yaw),
        }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Express a world-space direction in character space.
    ///
    /// The result is laid out as `(lateral, vertical, forward)`: `x` is positive to the
    /// character's right, `z` is positive along its facing. This is the layout animation
    /// blend spaces consume.
    pub fn to_local_direction(&self, world: Vec3) -> Vec3 {
        Vec3::new(
            world.dot(self.right()),
            world.dot(self.up()),
            world.dot(self.forward()),
        )
    }

    /// Interpolate between two transforms
    pub fn lerp(a: &Transform, b: &Transform, t: f32) -> Transform {
        Transform {
            position: a.position.lerp(b.position, t),
            rotation: a.rotation.slerp(b.rotation, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_direction_identity() {
        let transform = Transform::default();
        let local = transform.to_local_direction(Vec3::new(0.0, 0.0, -1.0));
        assert!((local.z - 1.0).abs() < 1e-5);
        assert!(local.x.abs() < 1e-5);

        let local = transform.to_local_direction(Vec3::X);
        assert!((local.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_local_direction_follows_yaw() {
        // Quarter turn to the right: facing +X
        let transform = Transform::from_position_yaw(Vec3::ZERO, std::f32::consts::FRAC_PI_2);
        assert!((transform.forward() - Vec3::X).length() < 1e-5);

        let local = transform.to_local_direction(Vec3::X);
        assert!((local.z - 1.0).abs() < 1e-5);
        assert!(local.x.abs() < 1e-5);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Transform::from_position(Vec3::ZERO);
        let b = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));
        let mid = Transform::lerp(&a, &b, 0.5);
        assert!((mid.position.x - 1.0).abs() < 1e-5);
    }
}
