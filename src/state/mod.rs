pub mod phase;
pub mod store;

pub use phase::{derive_phase, release_phase, BubblePhaseChanged};
pub use store::{BubbleRecord, PositionStore};
