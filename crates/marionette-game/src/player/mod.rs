//! Player character movement
//!
//! A kinematic motor standing in for a physics-driven character: it exposes the
//! locomotion, jump, ground and placement capabilities the control layer drives.

mod motor;
mod movement;

pub use motor::KinematicMotor;
pub use movement::MovementConfig;
