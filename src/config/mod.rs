//! Configuration module for element lookup
//!
//! This module provides the `FinderConfig` struct and its builder. The
//! config is passed to a finder explicitly; nothing is read from the
//! environment.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::FinderConfigBuilder;
pub use types::{ConfigError, FinderConfig};
