pub mod collision;
pub mod easing;
pub mod rest;

pub use collision::{CollisionReport, CollisionResolver};
pub use easing::Easing;
pub use rest::{RestReport, ReturnToRestController};
