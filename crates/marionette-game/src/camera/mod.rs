//! Camera rig
//!
//! Orbiting first/third-person camera driven by `Look` deltas. Its yaw is what steering
//! is made relative to.

mod config;
mod controller;

pub use config::CameraConfig;
pub use controller::{CameraController, CameraMode};
