use thiserror::Error;

/// Errors raised while wiring a character's control layer.
///
/// All of these are configuration errors: they surface at construction and indicate a
/// mismatch between code and content, never a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("animation parameter '{name}' could not be resolved for signal {signal}")]
    MissingParameter { signal: &'static str, name: String },

    #[error("required capability '{0}' was not provided")]
    MissingCapability(&'static str),

    #[error("animation parameter '{0}' is declared twice")]
    DuplicateParameter(String),
}
