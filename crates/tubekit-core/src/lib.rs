//! Tubekit Core Library
//!
//! This crate provides the domain models, configuration, and shared types for the
//! tube content-management add-on: channels, series, seasons, episodes, and clips.

pub mod config;
pub mod constants;
pub mod models;
pub mod storage_types;
pub mod telemetry;

// Re-export commonly used types
pub use config::TubeConfig;
pub use storage_types::StorageBackend;
