//! Screen-space geometry shared by every stage of the engine.
//!
//! Positions are the top-left corner of a bubble's bounding box with y growing
//! downwards, matching how the menu is laid out on screen.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Largest top-left corner a bubble of `radius` may occupy. Never negative, so a
    /// bubble wider than the viewport is pinned at the origin instead of panicking.
    pub fn max_corner(&self, radius: f32) -> Vec2 {
        Vec2::new(
            (self.width - radius * 2.0).max(0.0),
            (self.height - radius * 2.0).max(0.0),
        )
    }

    /// Constrain `pos` to `[0, w - 2r] x [0, h - 2r]`.
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        let max = self.max_corner(radius);
        Vec2::new(clamp_axis(pos.x, 0.0, max.x), clamp_axis(pos.y, 0.0, max.y))
    }

    /// Like [`Viewport::clamp`] but keeps `edge_margin` free on the left and right.
    /// The result still satisfies the plain bounds clamp when the margin does not fit.
    pub fn clamp_with_edge_margin(&self, pos: Vec2, radius: f32, edge_margin: f32) -> Vec2 {
        let max = self.max_corner(radius);
        let x = pos.x.min(max.x - edge_margin).max(edge_margin);
        self.clamp(Vec2::new(x, pos.y), radius)
    }

    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        let max = self.max_corner(radius);
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= max.x && pos.y <= max.y
    }

    /// Bubble center in y-up world coordinates with the origin at the viewport center.
    pub fn to_world(&self, corner: Vec2, radius: f32) -> Vec2 {
        let center = corner + Vec2::splat(radius);
        Vec2::new(center.x - self.width * 0.5, self.height * 0.5 - center.y)
    }
}

// NaN-safe and never panics on an inverted range, unlike `f32::clamp`.
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        return lo;
    }
    v.min(hi).max(lo)
}

/// Minimum center distance two bubbles keep before they count as overlapping.
pub fn min_separation(radius_a: f32, radius_b: f32, margin: f32) -> f32 {
    radius_a + radius_b + margin
}
