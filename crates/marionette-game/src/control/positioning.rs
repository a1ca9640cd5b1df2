//! Resolution of the character's placement capabilities

use glam::{Quat, Vec3};

use crate::capability::{Body, Shared, TransformSource, Warp};

/// How the dispatcher reaches the character's world placement.
///
/// A single body offering both read and warp access is preferred; otherwise the two
/// capabilities are used independently, and either may be missing. Missing capabilities
/// make the corresponding reads return `None` and writes do nothing.
pub enum Positioning {
    Combined(Shared<dyn Body>),
    Separate {
        transform: Option<Shared<dyn TransformSource>>,
        warp: Option<Shared<dyn Warp>>,
    },
}

impl Positioning {
    /// Pick the combined body when present, else compose the separate capabilities
    pub fn resolve(
        body: Option<Shared<dyn Body>>,
        transform: Option<Shared<dyn TransformSource>>,
        warp: Option<Shared<dyn Warp>>,
    ) -> Self {
        match body {
            Some(body) => Self::Combined(body),
            None => Self::Separate { transform, warp },
        }
    }

    /// Whether the world placement can be read
    pub fn can_read(&self) -> bool {
        match self {
            Self::Combined(_) => true,
            Self::Separate { transform, .. } => transform.is_some(),
        }
    }

    /// Whether the world placement can be warped
    pub fn can_warp(&self) -> bool {
        match self {
            Self::Combined(_) => true,
            Self::Separate { warp, .. } => warp.is_some(),
        }
    }

    /// True if either capability is unavailable
    pub fn is_degraded(&self) -> bool {
        !(self.can_read() && self.can_warp())
    }

    pub fn position(&self) -> Option<Vec3> {
        match self {
            Self::Combined(body) => Some(body.borrow().position()),
            Self::Separate { transform, .. } => transform.as_ref().map(|t| t.borrow().position()),
        }
    }

    pub fn orientation(&self) -> Option<Quat> {
        match self {
            Self::Combined(body) => Some(body.borrow().orientation()),
            Self::Separate { transform, .. } => {
                transform.as_ref().map(|t| t.borrow().orientation())
            }
        }
    }

    /// Warp to a position. Returns false when no warp capability is available.
    pub fn warp_position(&self, position: Vec3) -> bool {
        match self {
            Self::Combined(body) => {
                body.borrow_mut().warp_position(position);
                true
            }
            Self::Separate { warp: Some(warp), .. } => {
                warp.borrow_mut().warp_position(position);
                true
            }
            Self::Separate { warp: None, .. } => false,
        }
    }

    /// Warp to an orientation. Returns false when no warp capability is available.
    pub fn warp_orientation(&self, orientation: Quat) -> bool {
        match self {
            Self::Combined(body) => {
                body.borrow_mut().warp_orientation(orientation);
                true
            }
            Self::Separate { warp: Some(warp), .. } => {
                warp.borrow_mut().warp_orientation(orientation);
                true
            }
            Self::Separate { warp: None, .. } => false,
        }
    }

    /// Short label for logs
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Combined(_) => "combined",
            Self::Separate {
                transform: Some(_),
                warp: Some(_),
            } => "separate",
            Self::Separate {
                transform: None,
                warp: None,
            } => "unavailable",
            Self::Separate { .. } => "partial",
        }
    }
}

impl std::fmt::Debug for Positioning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}
