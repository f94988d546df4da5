pub mod config;

pub use config::{
    BubbleMenuConfig, CollisionConfig, MenuLayoutConfig, RestConfig, ReturnEasing,
    SchedulerConfig, ViewportConfig,
};
