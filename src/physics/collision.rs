//! Pairwise circle separation over the position store.
//!
//! One corrective pass per logic tick: each overlapping pair is pushed apart along
//! the line between centers, half each, or fully onto the other bubble when one
//! of them is held by the pointer. Pairs are visited in item order and later pairs
//! see positions already corrected earlier in the same pass, so clusters of three
//! or more settle over a few ticks.

use bevy::prelude::*;

use crate::core::components::BubbleId;
use crate::core::config::CollisionConfig;
use crate::core::geometry::min_separation;
use crate::state::PositionStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    pub margin: f32,
    pub min_push: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::from(&CollisionConfig::default())
    }
}

impl From<&CollisionConfig> for CollisionResolver {
    fn from(cfg: &CollisionConfig) -> Self {
        Self {
            margin: cfg.margin,
            min_push: cfg.min_push.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Colliding pairs found this pass.
    pub pairs: usize,
    /// Bubbles that were moved, in first-touch order.
    pub touched: Vec<BubbleId>,
}

impl CollisionReport {
    fn touch(&mut self, id: &BubbleId) {
        if !self.touched.contains(id) {
            self.touched.push(id.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}

impl CollisionResolver {
    pub fn resolve(&self, store: &mut PositionStore) -> CollisionReport {
        let mut report = CollisionReport::default();
        let ids = store.ids().to_vec();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                self.resolve_pair(store, a, b, &mut report);
            }
        }
        report
    }

    fn resolve_pair(
        &self,
        store: &mut PositionStore,
        a: &BubbleId,
        b: &BubbleId,
        report: &mut CollisionReport,
    ) {
        let (Some(ra), Some(rb)) = (store.get(a).cloned(), store.get(b).cloned()) else {
            warn!("collision check skipped: missing record for {a} or {b}");
            return;
        };
        // Pairs that are both sitting at rest are left alone.
        if !ra.is_active() && !rb.is_active() {
            return;
        }
        if ra.dragging && rb.dragging {
            return;
        }
        let delta = rb.center() - ra.center();
        let distance = delta.length();
        let min_dist = min_separation(ra.radius, rb.radius, self.margin);
        if distance >= min_dist {
            return;
        }
        report.pairs += 1;
        let overlap = min_dist - distance;
        // Coincident centers: the earlier item in the menu goes -x, the later +x.
        let dir = if distance > 0.0 { delta / distance } else { Vec2::X };

        let (shift_a, shift_b) = match (ra.dragging, rb.dragging) {
            (true, _) => (Vec2::ZERO, dir * overlap.max(self.min_push)),
            (_, true) => (-dir * overlap.max(self.min_push), Vec2::ZERO),
            _ => {
                let half = (overlap * 0.5).max(self.min_push);
                (-dir * half, dir * half)
            }
        };
        trace!(%a, %b, overlap, "separating bubbles");
        if shift_a != Vec2::ZERO && store.set_position(a, ra.current() + shift_a).is_ok() {
            report.touch(a);
        }
        if shift_b != Vec2::ZERO && store.set_position(b, rb.current() + shift_b).is_ok() {
            report.touch(b);
        }
    }
}
