pub mod app;
pub mod core;
pub mod interaction;
pub mod layout;
pub mod menu;
pub mod physics;
pub mod state;

// Curated re-exports
pub use crate::app::plugin::{BubbleMenuPlugin, ViewportChanged};
pub use crate::core::components::{BubbleId, BubbleItem, BubblePhase, MenuBubble};
pub use crate::core::config::BubbleMenuConfig;
pub use crate::core::error::{MenuError, MenuResult};
pub use crate::core::geometry::Viewport;
pub use crate::interaction::drag::DragInput;
pub use crate::menu::{BubbleMenu, BubbleSnapshot, LogicOutcome, TickSummary};
pub use crate::state::BubblePhaseChanged;
