#[cfg(not(target_arch = "wasm32"))]
pub mod config_hot_reload;
pub mod drag;

pub use drag::{DragAdapter, DragInput};
