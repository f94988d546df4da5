use std::fmt::Debug;

use bevy::prelude::*;

use crate::core::config::ReturnEasing;

/// One logic tick's worth of motion from `current` toward `target`.
pub trait Easing: Debug + Send + Sync {
    fn step(&self, current: Vec2, target: Vec2) -> Vec2;
}

impl Easing for ReturnEasing {
    fn step(&self, current: Vec2, target: Vec2) -> Vec2 {
        match *self {
            ReturnEasing::Exponential { factor } => {
                let f = if factor.is_nan() { 0.0 } else { factor.max(0.0).min(1.0) };
                current + (target - current) * f
            }
            ReturnEasing::Linear { speed } => {
                let gap = target - current;
                let dist = gap.length();
                let speed = speed.max(0.0);
                if dist <= speed {
                    target
                } else {
                    current + gap / dist * speed
                }
            }
        }
    }
}
