use bevy::prelude::*;

use crate::core::components::BubbleId;
use crate::core::config::RestConfig;
use crate::physics::easing::Easing;
use crate::state::PositionStore;

/// Walks free bubbles back to their rest positions, one eased step per logic tick.
#[derive(Debug)]
pub struct ReturnToRestController {
    pub snap_threshold: f32,
    easing: Box<dyn Easing>,
    /// Set once a caller installs its own easing; config reloads leave it alone.
    custom_easing: bool,
}

impl Default for ReturnToRestController {
    fn default() -> Self {
        Self::from(&RestConfig::default())
    }
}

impl From<&RestConfig> for ReturnToRestController {
    fn from(cfg: &RestConfig) -> Self {
        Self {
            snap_threshold: cfg.snap_threshold.max(0.0),
            easing: Box::new(cfg.easing),
            custom_easing: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestReport {
    pub moved: Vec<BubbleId>,
    pub snapped: Vec<BubbleId>,
    /// Bubbles whose next step would have run into a neighbour; retried next tick.
    pub deferred: Vec<BubbleId>,
}

impl ReturnToRestController {
    pub fn with_easing(mut self, easing: impl Easing + 'static) -> Self {
        self.easing = Box::new(easing);
        self.custom_easing = true;
        self
    }

    /// Take new tunables from a reloaded config.
    pub fn reconfigure(&mut self, cfg: &RestConfig) {
        self.snap_threshold = cfg.snap_threshold.max(0.0);
        if !self.custom_easing {
            self.easing = Box::new(cfg.easing);
        }
    }

    pub fn easing(&self) -> &dyn Easing {
        self.easing.as_ref()
    }

    pub fn return_to_rest(&self, store: &mut PositionStore, margin: f32) -> RestReport {
        let mut report = RestReport::default();
        for id in store.ids().to_vec() {
            let Some(rec) = store.get(&id).cloned() else {
                warn!("return to rest skipped: missing record for {id}");
                continue;
            };
            if rec.dragging || rec.is_at_rest() {
                continue;
            }
            if store.is_colliding(&id, margin) {
                continue;
            }
            let current = rec.current();
            let snap = current.distance(rec.rest) <= self.snap_threshold;
            let target = if snap {
                rec.rest
            } else {
                self.easing.step(current, rec.rest)
            };
            let target = store.viewport().clamp(target, rec.radius);
            if store.overlaps_at(&id, target, margin) {
                report.deferred.push(id);
                continue;
            }
            if store.set_position(&id, target).is_err() {
                continue;
            }
            if snap {
                report.snapped.push(id);
            } else {
                report.moved.push(id);
            }
        }
        report
    }
}
