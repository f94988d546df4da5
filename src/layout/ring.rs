//! Rest positions for a radial menu: item 0 in the middle, the rest evenly
//! spaced on one ring around it.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::core::components::{BubbleId, BubbleItem};
use crate::core::config::MenuLayoutConfig;
use crate::core::geometry::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub menu_distance: f32,
    pub base_spacing: f32,
    pub rotation_divisor: f32,
    pub edge_margin: f32,
    pub bubble_radius: f32,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self::from(&MenuLayoutConfig::default())
    }
}

impl From<&MenuLayoutConfig> for RingLayout {
    fn from(cfg: &MenuLayoutConfig) -> Self {
        Self {
            menu_distance: cfg.menu_distance,
            base_spacing: cfg.base_spacing,
            rotation_divisor: cfg.rotation_divisor,
            edge_margin: cfg.edge_margin,
            bubble_radius: cfg.bubble_radius,
        }
    }
}

impl RingLayout {
    pub fn ring_radius(&self) -> f32 {
        self.menu_distance + self.base_spacing
    }

    /// Angle of item `index` out of `count`. The center item and degenerate
    /// menus (fewer than two items) sit at angle 0.
    pub fn angle(&self, index: usize, count: usize) -> f32 {
        if index == 0 || count < 2 {
            return 0.0;
        }
        let start = if self.rotation_divisor == 0.0 {
            0.0
        } else {
            PI / self.rotation_divisor
        };
        index as f32 * TAU / (count - 1) as f32 - start
    }

    /// Rest position (top-left corner) of item `index` with the given radius.
    pub fn position(&self, index: usize, count: usize, radius: f32, viewport: &Viewport) -> Vec2 {
        let distance = if index == 0 || count < 2 {
            0.0
        } else {
            self.ring_radius()
        };
        let angle = self.angle(index, count);
        let raw = viewport.center() + Vec2::new(angle.cos(), angle.sin()) * distance
            - Vec2::splat(radius);
        viewport.clamp_with_edge_margin(raw, radius, self.edge_margin)
    }

    /// Rest positions for a whole item list, in item order.
    pub fn rest_positions(&self, items: &[BubbleItem], viewport: &Viewport) -> Vec<(BubbleId, Vec2)> {
        let count = items.len();
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let radius = item.radius_or(self.bubble_radius);
                (item.id.clone(), self.position(i, count, radius, viewport))
            })
            .collect()
    }
}
