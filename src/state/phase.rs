use bevy::prelude::*;

use crate::core::components::{BubbleId, BubblePhase};
use crate::state::store::BubbleRecord;

/// Emitted whenever a bubble moves between interaction phases.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BubblePhaseChanged {
    pub id: BubbleId,
    pub from: BubblePhase,
    pub to: BubblePhase,
}

/// Phase implied by the live record. `colliding` is computed by the caller
/// against the rest of the store.
pub fn derive_phase(record: &BubbleRecord, colliding: bool) -> BubblePhase {
    if record.dragging {
        BubblePhase::Dragging
    } else if record.is_at_rest() {
        BubblePhase::AtRest
    } else if colliding {
        BubblePhase::Colliding
    } else {
        BubblePhase::Returning
    }
}

/// Phase a bubble enters the moment its drag is released.
pub fn release_phase(colliding: bool) -> BubblePhase {
    if colliding {
        BubblePhase::Colliding
    } else {
        BubblePhase::Returning
    }
}
