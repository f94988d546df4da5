//! Boundary between pointer input and the position store.
//!
//! Pointer moves arrive as cumulative offsets from the bubble's rest position and
//! may come much faster than the logic rate. They are coalesced per bubble (last
//! value wins) and written once per logic tick by [`DragAdapter::flush`].

use bevy::prelude::*;

use crate::core::components::BubbleId;
use crate::core::error::{MenuError, MenuResult};
use crate::state::PositionStore;

/// Pointer input keyed by bubble. One enum so start/move/end keep their order
/// within a frame.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum DragInput {
    Start { id: BubbleId },
    /// `delta` is the total pointer travel since the drag started.
    Move { id: BubbleId, delta: Vec2 },
    End { id: BubbleId },
}

#[derive(Debug, Clone, Default)]
pub struct DragAdapter {
    pending: Vec<(BubbleId, Vec2)>,
}

impl DragAdapter {
    pub fn drag_start(&mut self, store: &mut PositionStore, id: &BubbleId) -> MenuResult<()> {
        store.set_dragging(id, true)?;
        self.pending.retain(|(p, _)| p != id);
        Ok(())
    }

    /// Queue a move and return the clamped position it will produce.
    pub fn drag_move(&mut self, store: &PositionStore, id: &BubbleId, delta: Vec2) -> MenuResult<Option<Vec2>> {
        let rec = store.record(id)?;
        if !rec.dragging {
            debug!("drag move for {id} ignored: not dragging");
            return Ok(None);
        }
        match self.pending.iter_mut().find(|(p, _)| p == id) {
            Some(slot) => slot.1 = delta,
            None => self.pending.push((id.clone(), delta)),
        }
        Ok(Some(store.viewport().clamp(rec.rest + delta, rec.radius)))
    }

    /// Write every coalesced move into the store. Returns the ids written.
    pub fn flush(&mut self, store: &mut PositionStore) -> Vec<BubbleId> {
        let mut written = Vec::with_capacity(self.pending.len());
        for (id, delta) in self.pending.drain(..) {
            match apply_delta(store, &id, delta) {
                Ok(true) => written.push(id),
                Ok(false) => {}
                Err(e) => warn!("drag flush skipped: {e}"),
            }
        }
        written
    }

    /// Apply any pending move for `id`, then hand it back to the rest controller.
    pub fn drag_end(&mut self, store: &mut PositionStore, id: &BubbleId) -> MenuResult<()> {
        if !store.contains(id) {
            return Err(MenuError::UnknownBubble(id.clone()));
        }
        if let Some(idx) = self.pending.iter().position(|(p, _)| p == id) {
            let (_, delta) = self.pending.remove(idx);
            apply_delta(store, id, delta)?;
        }
        store.set_dragging(id, false)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

fn apply_delta(store: &mut PositionStore, id: &BubbleId, delta: Vec2) -> MenuResult<bool> {
    let rec = store.record(id)?;
    if !rec.dragging {
        return Ok(false);
    }
    let target = rec.rest + delta;
    store.set_position(id, target)?;
    Ok(true)
}
