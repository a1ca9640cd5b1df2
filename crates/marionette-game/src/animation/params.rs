//! Semantic animation signals and their resolved parameter handles

use serde::{Deserialize, Serialize};

use crate::capability::{AnimationEngine, ParameterId};
use crate::error::ControlError;

/// Signals the control layer drives on the animation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationSignal {
    /// Scalar movement speed (float)
    Speed,
    /// Ground contact (bool)
    IsGround,
    /// Forward component of the local move direction (float, damped)
    Forward,
    /// Lateral component of the local move direction (float, damped)
    SideStep,
    /// First jump off the ground (trigger)
    JumpStart,
    /// Aerial jump (trigger)
    DoubleJump,
}

impl AnimationSignal {
    pub const ALL: [AnimationSignal; 6] = [
        AnimationSignal::Speed,
        AnimationSignal::IsGround,
        AnimationSignal::Forward,
        AnimationSignal::SideStep,
        AnimationSignal::JumpStart,
        AnimationSignal::DoubleJump,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Speed => "Speed",
            Self::IsGround => "IsGround",
            Self::Forward => "Forward",
            Self::SideStep => "SideStep",
            Self::JumpStart => "JumpStart",
            Self::DoubleJump => "DoubleJump",
        }
    }
}

/// Parameter names as authored in the animation graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    pub speed: String,
    pub is_ground: String,
    pub forward: String,
    pub side_step: String,
    pub jump_start: String,
    pub double_jump: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            speed: "Speed".into(),
            is_ground: "IsGround".into(),
            forward: "Forward".into(),
            side_step: "SideStep".into(),
            jump_start: "JumpStart".into(),
            double_jump: "DoubleJump".into(),
        }
    }
}

impl ParameterNames {
    /// Authored name for a signal
    pub fn name(&self, signal: AnimationSignal) -> &str {
        match signal {
            AnimationSignal::Speed => &self.speed,
            AnimationSignal::IsGround => &self.is_ground,
            AnimationSignal::Forward => &self.forward,
            AnimationSignal::SideStep => &self.side_step,
            AnimationSignal::JumpStart => &self.jump_start,
            AnimationSignal::DoubleJump => &self.double_jump,
        }
    }
}

/// Resolved handles for every [`AnimationSignal`].
///
/// Built once against the animation engine; lookups afterwards cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationParameterTable {
    speed: ParameterId,
    is_ground: ParameterId,
    forward: ParameterId,
    side_step: ParameterId,
    jump_start: ParameterId,
    double_jump: ParameterId,
}

impl AnimationParameterTable {
    /// Resolve every signal, failing on the first name the engine does not know
    pub fn resolve(
        engine: &dyn AnimationEngine,
        names: &ParameterNames,
    ) -> Result<Self, ControlError> {
        let lookup = |signal: AnimationSignal| {
            let name = names.name(signal);
            engine
                .resolve(name)
                .ok_or_else(|| ControlError::MissingParameter {
                    signal: signal.label(),
                    name: name.to_string(),
                })
        };

        Ok(Self {
            speed: lookup(AnimationSignal::Speed)?,
            is_ground: lookup(AnimationSignal::IsGround)?,
            forward: lookup(AnimationSignal::Forward)?,
            side_step: lookup(AnimationSignal::SideStep)?,
            jump_start: lookup(AnimationSignal::JumpStart)?,
            double_jump: lookup(AnimationSignal::DoubleJump)?,
        })
    }

    /// Handle for a signal
    pub fn get(&self, signal: AnimationSignal) -> ParameterId {
        match signal {
            AnimationSignal::Speed => self.speed,
            AnimationSignal::IsGround => self.is_ground,
            AnimationSignal::Forward => self.forward,
            AnimationSignal::SideStep => self.side_step,
            AnimationSignal::JumpStart => self.jump_start,
            AnimationSignal::DoubleJump => self.double_jump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animator, ParameterKind};

    #[test]
    fn resolves_standard_controller() {
        let animator = Animator::locomotion_controller(&ParameterNames::default()).unwrap();
        let table = AnimationParameterTable::resolve(&animator, &ParameterNames::default())
            .expect("standard controller resolves");

        for signal in AnimationSignal::ALL {
            assert_eq!(Some(table.get(signal)), animator.resolve(signal.label()));
        }
    }

    #[test]
    fn handles_are_distinct() {
        let animator = Animator::locomotion_controller(&ParameterNames::default()).unwrap();
        let table = AnimationParameterTable::resolve(&animator, &ParameterNames::default()).unwrap();
        let mut ids: Vec<_> = AnimationSignal::ALL.iter().map(|s| table.get(*s).0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), AnimationSignal::ALL.len());
    }

    #[test]
    fn missing_parameter_fails_construction() {
        let mut animator = Animator::new();
        animator.declare("Speed", ParameterKind::Float).unwrap();
        animator.declare("IsGround", ParameterKind::Bool).unwrap();
        animator.declare("Forward", ParameterKind::Float).unwrap();
        animator.declare("SideStep", ParameterKind::Float).unwrap();
        animator.declare("JumpStart", ParameterKind::Trigger).unwrap();

        let err = AnimationParameterTable::resolve(&animator, &ParameterNames::default()).unwrap_err();
        assert_eq!(
            err,
            ControlError::MissingParameter {
                signal: "DoubleJump",
                name: "DoubleJump".into()
            }
        );
    }

    #[test]
    fn custom_names_are_honoured() {
        let names = ParameterNames {
            speed: "MoveSpeed".into(),
            ..Default::default()
        };
        let animator = Animator::locomotion_controller(&names).unwrap();
        assert!(AnimationParameterTable::resolve(&animator, &names).is_ok());
        assert!(AnimationParameterTable::resolve(&animator, &ParameterNames::default()).is_err());
    }
}
