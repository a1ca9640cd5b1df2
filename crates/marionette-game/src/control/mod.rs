//! Character control coordination
//!
//! The [`InputDispatcher`] is the single choke point between phased action events and
//! the movement, jump and camera subsystems, and performs the once-per-frame sync of
//! derived state into animation parameters.

mod config;
mod dispatcher;
mod positioning;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ControlConfig;
pub use dispatcher::{
    DerivedAnimationState, DispatcherBuilder, InputDispatcher, MoveIntent, SpeedMode,
};
pub use positioning::Positioning;
