use thiserror::Error;

use crate::core::components::BubbleId;

/// Failures surfaced by the engine. All of them are local to one bubble or one
/// configuration step; none should stop ticking for the rest of the menu.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MenuError {
    #[error("duplicate bubble id `{0}`")]
    DuplicateId(BubbleId),
    #[error("unknown bubble id `{0}`")]
    UnknownBubble(BubbleId),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type MenuResult<T> = Result<T, MenuError>;
