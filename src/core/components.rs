use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Stable identity of one menu entry. The only key shared between components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BubbleId(pub String);

impl BubbleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BubbleId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BubbleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Menu entry as handed in by the embedding app. Only `id` and `radius` are read;
/// whatever the bubble displays stays with the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleItem {
    pub id: BubbleId,
    #[serde(default)]
    pub radius: Option<f32>,
}

impl BubbleItem {
    pub fn new(id: impl Into<BubbleId>) -> Self {
        Self {
            id: id.into(),
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Radius override, or the menu-wide default.
    pub fn radius_or(&self, default: f32) -> f32 {
        self.radius.unwrap_or(default)
    }
}

/// Marker on the entity that presents a bubble. The renderer attaches its own
/// visuals next to it and reads the `Transform` kept in sync by the plugin.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct MenuBubble {
    pub id: BubbleId,
}

/// Where a bubble is in its interaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BubblePhase {
    #[default]
    AtRest,
    Dragging,
    Returning,
    Colliding,
}
