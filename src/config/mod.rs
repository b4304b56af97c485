//! Configuration module for the trip planner
//!
//! This module provides:
//! - Cache path resolution relative to the working directory
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::CachePaths;
pub use settings::Settings;
