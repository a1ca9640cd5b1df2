//! Marionette Core - Core types and utilities for the Marionette character stack
//!
//! This crate provides the foundational types shared by the control layer:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for world placement and local-space conversion
//! - Frame time with a fixed-step accumulator

pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;
