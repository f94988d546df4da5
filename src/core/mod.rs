pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod system;
