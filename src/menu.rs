// This file is part of Bubble Menu.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The engine facade: owns the position store and every stage that mutates it,
//! and exposes the per-bubble queries a renderer polls each frame.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use serde::Serialize;

use crate::app::scheduler::DualRateScheduler;
use crate::app::visual::VisualTrack;
use crate::core::components::{BubbleId, BubbleItem, BubblePhase};
use crate::core::config::BubbleMenuConfig;
use crate::core::error::MenuResult;
use crate::core::geometry::Viewport;
use crate::interaction::drag::DragAdapter;
use crate::layout::RingLayout;
use crate::physics::{
    CollisionReport, CollisionResolver, Easing, RestReport, ReturnToRestController,
};
use crate::state::{derive_phase, release_phase, BubblePhaseChanged, PositionStore};

/// What a logic tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicOutcome {
    /// Nothing dragged and everything at rest; no work done.
    Idle,
    Ran {
        dragged: Vec<BubbleId>,
        collisions: CollisionReport,
        rest: RestReport,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub logic: Option<LogicOutcome>,
    pub ui: bool,
}

/// Serializable view of one bubble, for tooling and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSnapshot {
    pub id: BubbleId,
    pub radius: f32,
    pub position: [f32; 2],
    pub visual: [f32; 2],
    pub rest: [f32; 2],
    pub dragging: bool,
    pub phase: BubblePhase,
}

#[derive(Resource, Debug)]
pub struct BubbleMenu {
    config: BubbleMenuConfig,
    items: Vec<BubbleItem>,
    layout: RingLayout,
    store: PositionStore,
    drag: DragAdapter,
    resolver: CollisionResolver,
    rest: ReturnToRestController,
    scheduler: DualRateScheduler,
    visuals: HashMap<BubbleId, VisualTrack>,
    phase_changes: Vec<BubblePhaseChanged>,
    generation: u64,
}

impl BubbleMenu {
    pub fn new(items: Vec<BubbleItem>, config: BubbleMenuConfig) -> MenuResult<Self> {
        let layout = RingLayout::from(&config.menu);
        let store = PositionStore::build(&items, &layout, config.viewport.viewport())?;
        Ok(Self::assemble(items, config, layout, store))
    }

    /// A menu with no bubbles; every query returns `None` and ticks are no-ops.
    pub fn empty(config: BubbleMenuConfig) -> Self {
        let layout = RingLayout::from(&config.menu);
        let store = PositionStore::new(config.viewport.viewport());
        Self::assemble(Vec::new(), config, layout, store)
    }

    fn assemble(
        items: Vec<BubbleItem>,
        config: BubbleMenuConfig,
        layout: RingLayout,
        store: PositionStore,
    ) -> Self {
        let mut menu = Self {
            resolver: CollisionResolver::from(&config.collision),
            rest: ReturnToRestController::from(&config.rest),
            scheduler: DualRateScheduler::from(&config.scheduler),
            config,
            items,
            layout,
            store,
            drag: DragAdapter::default(),
            visuals: HashMap::new(),
            phase_changes: Vec::new(),
            generation: 0,
        };
        menu.reset_visuals();
        menu
    }

    pub fn with_easing(mut self, easing: impl Easing + 'static) -> Self {
        self.rest = ReturnToRestController::from(&self.config.rest).with_easing(easing);
        self
    }

    pub fn config(&self) -> &BubbleMenuConfig {
        &self.config
    }

    pub fn items(&self) -> &[BubbleItem] {
        &self.items
    }

    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    pub fn scheduler(&self) -> &DualRateScheduler {
        &self.scheduler
    }

    pub fn viewport(&self) -> Viewport {
        self.store.viewport()
    }

    /// Bumped whenever the set of bubbles changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ---- queries polled by the rendering layer ----

    pub fn ids(&self) -> &[BubbleId] {
        self.store.ids()
    }

    pub fn position(&self, id: &BubbleId) -> Option<Vec2> {
        self.store.position(id)
    }

    pub fn is_dragging(&self, id: &BubbleId) -> Option<bool> {
        self.store.is_dragging(id)
    }

    pub fn rest_position(&self, id: &BubbleId) -> Option<Vec2> {
        self.store.rest(id)
    }

    pub fn radius(&self, id: &BubbleId) -> Option<f32> {
        self.store.radius(id)
    }

    pub fn visual_position(&self, id: &BubbleId) -> Option<Vec2> {
        self.visuals.get(id).map(VisualTrack::position)
    }

    pub fn phase(&self, id: &BubbleId) -> Option<BubblePhase> {
        self.store.get(id).map(|r| r.phase)
    }

    pub fn is_colliding(&self, id: &BubbleId) -> Option<bool> {
        self.store
            .contains(id)
            .then(|| self.store.is_colliding(id, self.resolver.margin))
    }

    pub fn snapshot(&self) -> Vec<BubbleSnapshot> {
        self.store
            .ids()
            .iter()
            .filter_map(|id| {
                let rec = self.store.get(id)?;
                let visual = self.visual_position(id).unwrap_or(rec.current());
                Some(BubbleSnapshot {
                    id: id.clone(),
                    radius: rec.radius,
                    position: rec.current().to_array(),
                    visual: visual.to_array(),
                    rest: rec.rest.to_array(),
                    dragging: rec.dragging,
                    phase: rec.phase,
                })
            })
            .collect()
    }

    /// Drain phase transitions recorded since the last call.
    pub fn take_phase_changes(&mut self) -> Vec<BubblePhaseChanged> {
        std::mem::take(&mut self.phase_changes)
    }

    // ---- pointer input ----

    pub fn drag_start(&mut self, id: &BubbleId) {
        if let Err(e) = self.drag.drag_start(&mut self.store, id) {
            warn!("drag start ignored: {e}");
            return;
        }
        self.set_phase(id, BubblePhase::Dragging);
        if let Some(pos) = self.store.position(id) {
            self.visual_mut(id).snap(pos);
        }
    }

    /// `delta` is the pointer's total travel since the drag started. The store sees
    /// it on the next logic tick; the rendered bubble follows immediately.
    pub fn drag_move(&mut self, id: &BubbleId, delta: Vec2) {
        match self.drag.drag_move(&self.store, id, delta) {
            Ok(Some(preview)) => self.visual_mut(id).snap(preview),
            Ok(None) => {}
            Err(e) => warn!("drag move ignored: {e}"),
        }
    }

    pub fn drag_end(&mut self, id: &BubbleId) {
        if let Err(e) = self.drag.drag_end(&mut self.store, id) {
            warn!("drag end ignored: {e}");
            return;
        }
        let colliding = self.store.is_colliding(id, self.resolver.margin);
        let phase = match self.store.get(id) {
            Some(rec) if rec.is_at_rest() => BubblePhase::AtRest,
            _ => release_phase(colliding),
        };
        self.set_phase(id, phase);
        if let Some(pos) = self.store.position(id) {
            self.visual_mut(id).snap(pos);
        }
    }

    // ---- ticking ----

    /// Feed elapsed monotonic time; runs whichever ticks are due, logic first.
    pub fn advance(&mut self, dt: Duration) -> TickSummary {
        let plan = self.scheduler.advance(dt);
        let logic = plan.logic.then(|| self.logic_tick());
        if plan.ui {
            self.ui_tick();
        }
        TickSummary {
            logic,
            ui: plan.ui,
        }
    }

    pub fn logic_tick(&mut self) -> LogicOutcome {
        let dragged = self.drag.flush(&mut self.store);
        for id in &dragged {
            if let Some(pos) = self.store.position(id) {
                self.visual_mut(id).snap(pos);
            }
        }
        // Recomputed from live state every tick, never cached across ticks.
        if !self.store.any_active() {
            trace!("logic tick idle");
            self.retarget_visuals();
            return LogicOutcome::Idle;
        }
        let collisions = self.resolver.resolve(&mut self.store);
        let rest = self.rest.return_to_rest(&mut self.store, self.resolver.margin);
        self.refresh_phases();
        self.retarget_visuals();
        LogicOutcome::Ran {
            dragged,
            collisions,
            rest,
        }
    }

    pub fn ui_tick(&mut self) {
        for (id, track) in self.visuals.iter_mut() {
            if self.store.is_dragging(id) == Some(true) {
                continue;
            }
            track.advance();
        }
    }

    // ---- reconfiguration ----

    /// Recompute rest positions for a resized viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport.width = viewport.width;
        self.config.viewport.height = viewport.height;
        self.store.relayout(&self.items, &self.layout, viewport);
        info!(
            "bubble menu relayout for {}x{}",
            viewport.width, viewport.height
        );
        self.refresh_phases();
        self.retarget_visuals();
    }

    /// Swap the item list. Bubbles that survive keep their position and drag state.
    pub fn set_items(&mut self, items: Vec<BubbleItem>) -> MenuResult<()> {
        let store = self.store.rebuild(&items, &self.layout)?;
        self.store = store;
        self.items = items;
        self.drag.clear();
        self.visuals.retain(|id, _| self.store.contains(id));
        for id in self.store.ids() {
            if !self.visuals.contains_key(id) {
                if let Some(pos) = self.store.position(id) {
                    self.visuals.insert(id.clone(), VisualTrack::at(pos));
                }
            }
        }
        self.generation += 1;
        Ok(())
    }

    /// Apply new tunables without disturbing current positions. Geometry changes
    /// relayout rest positions.
    pub fn apply_config(&mut self, config: BubbleMenuConfig) {
        let geometry_changed =
            config.menu != self.config.menu || config.viewport != self.config.viewport;
        self.resolver = CollisionResolver::from(&config.collision);
        self.rest.reconfigure(&config.rest);
        if config.scheduler != self.config.scheduler {
            self.scheduler = DualRateScheduler::from(&config.scheduler);
        }
        self.layout = RingLayout::from(&config.menu);
        let viewport = config.viewport.viewport();
        self.config = config;
        if geometry_changed {
            self.set_viewport(viewport);
        }
    }

    // ---- internals ----

    fn visual_mut(&mut self, id: &BubbleId) -> &mut VisualTrack {
        let fallback = self.store.position(id).unwrap_or_default();
        self.visuals
            .entry(id.clone())
            .or_insert_with(|| VisualTrack::at(fallback))
    }

    fn reset_visuals(&mut self) {
        self.visuals = self
            .store
            .ids()
            .iter()
            .filter_map(|id| Some((id.clone(), VisualTrack::at(self.store.position(id)?))))
            .collect();
    }

    fn retarget_visuals(&mut self) {
        let steps = self.scheduler.steps_per_logic();
        for id in self.store.ids() {
            let Some(rec) = self.store.get(id) else {
                continue;
            };
            let Some(track) = self.visuals.get_mut(id) else {
                continue;
            };
            if rec.dragging {
                track.snap(rec.current());
            } else if track.target() != rec.current() {
                track.retarget(rec.current(), steps);
            }
        }
    }

    fn refresh_phases(&mut self) {
        let margin = self.resolver.margin;
        for id in self.store.ids().to_vec() {
            let Some(rec) = self.store.get(&id) else {
                continue;
            };
            let colliding =
                !rec.dragging && !rec.is_at_rest() && self.store.is_colliding(&id, margin);
            let next = derive_phase(rec, colliding);
            self.set_phase(&id, next);
        }
    }

    fn set_phase(&mut self, id: &BubbleId, to: BubblePhase) {
        match self.store.set_phase(id, to) {
            Ok(from) if from != to => {
                debug!("bubble {id}: {from:?} -> {to:?}");
                self.phase_changes.push(BubblePhaseChanged {
                    id: id.clone(),
                    from,
                    to,
                });
            }
            Ok(_) => {}
            Err(e) => warn!("phase update skipped: {e}"),
        }
    }
}
