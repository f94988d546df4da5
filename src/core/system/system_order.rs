//! Central system ordering labels to make the per-frame sequence explicit.
//! Stages:
//! 1. Input (drag events and viewport changes reach the engine)
//! 2. Logic (scheduler advances; logic and UI ticks run as due)
//! 3. Present (visual positions copied to transforms, phase events emitted)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum MenuSet {
    Input,
    Logic,
    Present,
}
