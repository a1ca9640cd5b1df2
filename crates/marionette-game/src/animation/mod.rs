//! Animation parameter plumbing
//!
//! Maps the control layer's semantic signals onto animation graph parameters.

mod animator;
mod params;

use serde::{Deserialize, Serialize};

pub use animator::{damp, Animator, ParameterKind, ParameterValue};
pub use params::{AnimationParameterTable, AnimationSignal, ParameterNames};

/// Animation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Parameter names authored in the animation graph
    pub parameters: ParameterNames,
}
