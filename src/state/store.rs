//! Authoritative per-bubble state, keyed by [`BubbleId`].
//!
//! Every write to a current position goes through [`Viewport::clamp`]; the field
//! is private so no caller can bypass it.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::core::components::{BubbleId, BubbleItem, BubblePhase};
use crate::core::error::{MenuError, MenuResult};
use crate::core::geometry::{min_separation, Viewport};
use crate::layout::RingLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleRecord {
    pub radius: f32,
    pub rest: Vec2,
    current: Vec2,
    pub dragging: bool,
    pub phase: BubblePhase,
}

impl BubbleRecord {
    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn center(&self) -> Vec2 {
        self.current + Vec2::splat(self.radius)
    }

    pub fn is_at_rest(&self) -> bool {
        self.current == self.rest
    }

    /// Dragged or displaced bubbles take part in collision passes.
    pub fn is_active(&self) -> bool {
        self.dragging || !self.is_at_rest()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    viewport: Viewport,
    order: Vec<BubbleId>,
    records: HashMap<BubbleId, BubbleRecord>,
}

impl PositionStore {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            order: Vec::new(),
            records: HashMap::new(),
        }
    }

    /// Create one record per item, each starting at its rest position.
    pub fn build(items: &[BubbleItem], layout: &RingLayout, viewport: Viewport) -> MenuResult<Self> {
        let mut store = Self::new(viewport);
        let rest = layout.rest_positions(items, &viewport);
        for (item, (id, rest)) in items.iter().zip(rest) {
            if store.records.contains_key(&id) {
                return Err(MenuError::DuplicateId(id));
            }
            let radius = sanitize_radius(item.radius_or(layout.bubble_radius));
            store.order.push(id.clone());
            store.records.insert(
                id,
                BubbleRecord {
                    radius,
                    rest,
                    current: rest,
                    dragging: false,
                    phase: BubblePhase::AtRest,
                },
            );
        }
        Ok(store)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in item order (index 0 is the center bubble).
    pub fn ids(&self) -> &[BubbleId] {
        &self.order
    }

    pub fn contains(&self, id: &BubbleId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &BubbleId) -> Option<&BubbleRecord> {
        self.records.get(id)
    }

    pub fn record(&self, id: &BubbleId) -> MenuResult<&BubbleRecord> {
        self.records
            .get(id)
            .ok_or_else(|| MenuError::UnknownBubble(id.clone()))
    }

    fn record_mut(&mut self, id: &BubbleId) -> MenuResult<&mut BubbleRecord> {
        self.records
            .get_mut(id)
            .ok_or_else(|| MenuError::UnknownBubble(id.clone()))
    }

    pub fn position(&self, id: &BubbleId) -> Option<Vec2> {
        self.get(id).map(BubbleRecord::current)
    }

    pub fn rest(&self, id: &BubbleId) -> Option<Vec2> {
        self.get(id).map(|r| r.rest)
    }

    pub fn radius(&self, id: &BubbleId) -> Option<f32> {
        self.get(id).map(|r| r.radius)
    }

    pub fn is_dragging(&self, id: &BubbleId) -> Option<bool> {
        self.get(id).map(|r| r.dragging)
    }

    /// Write a clamped position and return what was stored.
    pub fn set_position(&mut self, id: &BubbleId, pos: Vec2) -> MenuResult<Vec2> {
        let viewport = self.viewport;
        let rec = self.record_mut(id)?;
        rec.current = viewport.clamp(pos, rec.radius);
        Ok(rec.current)
    }

    pub fn set_dragging(&mut self, id: &BubbleId, dragging: bool) -> MenuResult<()> {
        self.record_mut(id)?.dragging = dragging;
        Ok(())
    }

    /// Store a new phase and hand back the previous one.
    pub fn set_phase(&mut self, id: &BubbleId, phase: BubblePhase) -> MenuResult<BubblePhase> {
        let rec = self.record_mut(id)?;
        Ok(std::mem::replace(&mut rec.phase, phase))
    }

    pub fn any_dragging(&self) -> bool {
        self.records.values().any(|r| r.dragging)
    }

    /// True while any bubble is dragged or away from rest. Evaluated from live
    /// state on every call.
    pub fn any_active(&self) -> bool {
        self.records.values().any(BubbleRecord::is_active)
    }

    /// Would bubble `id`, placed at `pos`, overlap any other bubble?
    pub fn overlaps_at(&self, id: &BubbleId, pos: Vec2, margin: f32) -> bool {
        let Some(me) = self.get(id) else {
            return false;
        };
        let center = pos + Vec2::splat(me.radius);
        self.records.iter().any(|(other_id, other)| {
            other_id != id
                && center.distance(other.center()) < min_separation(me.radius, other.radius, margin)
        })
    }

    pub fn is_colliding(&self, id: &BubbleId, margin: f32) -> bool {
        match self.position(id) {
            Some(pos) => self.overlaps_at(id, pos, margin),
            None => false,
        }
    }

    /// Recompute radii and rest positions for a new viewport or ring geometry.
    /// Settled bubbles move with their rest position; displaced ones are pulled
    /// back inside the new bounds and left to return on their own.
    pub fn relayout(&mut self, items: &[BubbleItem], layout: &RingLayout, viewport: Viewport) {
        self.viewport = viewport;
        let radii: HashMap<&BubbleId, f32> = items
            .iter()
            .map(|item| (&item.id, sanitize_radius(item.radius_or(layout.bubble_radius))))
            .collect();
        let count = self.order.len();
        for (index, id) in self.order.iter().enumerate() {
            if let Some(rec) = self.records.get_mut(id) {
                let settled = !rec.is_active();
                if let Some(&radius) = radii.get(id) {
                    rec.radius = radius;
                }
                rec.rest = layout.position(index, count, rec.radius, &viewport);
                rec.current = if settled {
                    rec.rest
                } else {
                    viewport.clamp(rec.current, rec.radius)
                };
            }
        }
    }

    /// Replace the item list. Surviving ids keep their current position and drag
    /// state; new ids start at rest.
    pub fn rebuild(&self, items: &[BubbleItem], layout: &RingLayout) -> MenuResult<Self> {
        let mut next = Self::build(items, layout, self.viewport)?;
        for id in next.order.clone() {
            if let (Some(old), Some(new)) = (self.records.get(&id), next.records.get_mut(&id)) {
                new.current = next.viewport.clamp(old.current, new.radius);
                new.dragging = old.dragging;
                new.phase = old.phase;
            }
        }
        Ok(next)
    }
}

fn sanitize_radius(radius: f32) -> f32 {
    if radius.is_finite() {
        radius.max(0.0)
    } else {
        0.0
    }
}
