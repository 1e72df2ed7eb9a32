//! Configuration module for the search pipeline
//!
//! This module provides the `StillbrookConfig` struct and its builder for
//! configuring provider access, browser rendering and classification
//! thresholds with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::StillbrookConfigBuilder;
pub use types::StillbrookConfig;
