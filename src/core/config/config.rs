use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::core::error::{MenuError, MenuResult};
use crate::core::geometry::Viewport;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}
impl Default for ViewportConfig {
    fn default() -> Self {
        let vp = Viewport::default();
        Self {
            width: vp.width,
            height: vp.height,
        }
    }
}
impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// Ring geometry used to compute rest positions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MenuLayoutConfig {
    /// Extra ring spacing on top of `base_spacing`.
    pub menu_distance: f32,
    /// Radius for items that do not carry their own.
    pub bubble_radius: f32,
    /// Minimum ring radius.
    pub base_spacing: f32,
    /// Ring start angle is `-PI / rotation_divisor`.
    pub rotation_divisor: f32,
    /// Horizontal gap kept free at both screen edges for rest positions.
    pub edge_margin: f32,
}
impl Default for MenuLayoutConfig {
    fn default() -> Self {
        Self {
            menu_distance: 20.0,
            bubble_radius: 50.0,
            base_spacing: 130.0,
            rotation_divisor: 4.0,
            edge_margin: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    /// Added to the sum of radii when testing for overlap.
    pub margin: f32,
    /// Smallest per-bubble correction applied once a collision is found.
    pub min_push: f32,
}
impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            min_push: 0.5,
        }
    }
}

/// Curve used to walk a released bubble back to its rest position.
///
/// Written as `(kind: "Linear", speed: 20.0)`. The tag lives inside the map so the
/// value survives layered merging, which goes through untyped RON values.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind")]
pub enum ReturnEasing {
    /// Cover `factor` of the remaining distance each logic tick.
    Exponential { factor: f32 },
    /// Cover at most `speed` units each logic tick.
    Linear { speed: f32 },
}
impl Default for ReturnEasing {
    fn default() -> Self {
        ReturnEasing::Exponential { factor: 0.2 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RestConfig {
    /// Distance under which a bubble snaps exactly onto its rest position.
    pub snap_threshold: f32,
    pub easing: ReturnEasing,
}
impl Default for RestConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 1.0,
            easing: ReturnEasing::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub logic_hz: f32,
    pub ui_hz: f32,
}
impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            logic_hz: 20.0,
            ui_hz: 60.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BubbleMenuConfig {
    pub viewport: ViewportConfig,
    pub menu: MenuLayoutConfig,
    pub collision: CollisionConfig,
    pub rest: RestConfig,
    pub scheduler: SchedulerConfig,
}

impl BubbleMenuConfig {
    /// Load from a single RON file (errors contain human-readable context).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load file; on failure returns default config plus error string.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple layers; later overrides earlier (deep merge).
    /// Skips missing files; returns (config, used_paths, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        match merged {
            Some(val) => match val.into_rust::<BubbleMenuConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (BubbleMenuConfig::default(), used, errors)
                }
            },
            None => (BubbleMenuConfig::default(), used, errors),
        }
    }

    /// Hard check: every tunable must be a finite number. Unlike [`Self::validate`]
    /// this rejects the config outright.
    pub fn ensure_finite(&self) -> MenuResult<()> {
        let easing = match self.rest.easing {
            ReturnEasing::Exponential { factor } => ("rest.easing.factor", factor),
            ReturnEasing::Linear { speed } => ("rest.easing.speed", speed),
        };
        let fields = [
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
            ("menu.menu_distance", self.menu.menu_distance),
            ("menu.bubble_radius", self.menu.bubble_radius),
            ("menu.base_spacing", self.menu.base_spacing),
            ("menu.rotation_divisor", self.menu.rotation_divisor),
            ("menu.edge_margin", self.menu.edge_margin),
            ("collision.margin", self.collision.margin),
            ("collision.min_push", self.collision.min_push),
            ("rest.snap_threshold", self.rest.snap_threshold),
            easing,
            ("scheduler.logic_hz", self.scheduler.logic_hz),
            ("scheduler.ui_hz", self.scheduler.ui_hz),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(MenuError::InvalidConfig(format!("{name} is {v}"))),
            None => Ok(()),
        }
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let vp = &self.viewport;
        if vp.width <= 0.0 || vp.height <= 0.0 {
            w.push("viewport dimensions must be > 0".into());
        }
        let m = &self.menu;
        if m.bubble_radius <= 0.0 {
            w.push("menu.bubble_radius must be > 0".into());
        }
        if m.bubble_radius * 2.0 > vp.width.min(vp.height) {
            w.push(format!(
                "menu.bubble_radius {} exceeds half the viewport; bubbles pin to the origin",
                m.bubble_radius
            ));
        }
        if m.menu_distance + m.base_spacing < 0.0 {
            w.push("menu ring radius (menu_distance + base_spacing) negative".into());
        }
        if m.rotation_divisor == 0.0 {
            w.push("menu.rotation_divisor is 0; start angle undefined, treated as 0".into());
        }
        if m.edge_margin < 0.0 {
            w.push("menu.edge_margin negative".into());
        }
        if m.edge_margin * 2.0 + m.bubble_radius * 2.0 > vp.width {
            w.push(format!(
                "menu.edge_margin {} leaves no horizontal room for a bubble",
                m.edge_margin
            ));
        }
        if self.collision.margin < 0.0 {
            w.push("collision.margin negative; bubbles may visibly overlap".into());
        }
        if self.collision.min_push < 0.0 {
            w.push("collision.min_push negative".into());
        }
        if self.rest.snap_threshold <= 0.0 {
            w.push("rest.snap_threshold must be > 0 or bubbles never settle".into());
        }
        match self.rest.easing {
            ReturnEasing::Exponential { factor } => {
                if !(factor > 0.0 && factor <= 1.0) {
                    w.push(format!("rest.easing factor {factor} outside (0, 1]"));
                }
            }
            ReturnEasing::Linear { speed } => {
                if speed <= 0.0 {
                    w.push(format!("rest.easing speed {speed} must be > 0"));
                }
            }
        }
        let s = &self.scheduler;
        if s.logic_hz <= 0.0 || s.ui_hz <= 0.0 {
            w.push("scheduler rates must be > 0".into());
        } else if s.ui_hz < s.logic_hz {
            w.push(format!(
                "scheduler.ui_hz {} lower than logic_hz {}; visuals lag logic",
                s.ui_hz, s.logic_hz
            ));
        }
        w
    }
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                    if let Some(val) = incoming.take() {
                        merge_value(ev, val);
                    }
                }
                if let Some(val) = incoming {
                    bm.insert(k, val);
                }
            }
        }
        (b, o) => *b = o,
    }
}
