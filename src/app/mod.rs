pub mod plugin;
pub mod scheduler;
pub mod visual;

pub use plugin::{BubbleMenuPlugin, ViewportChanged};
pub use scheduler::{DualRateScheduler, PeriodicTask, TickPlan};
pub use visual::VisualTrack;
