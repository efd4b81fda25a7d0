//! Shared utilities for stockcrew
//!
//! This crate provides common functionality used across the stockcrew workspace:
//! key/value configuration sources, the application-level settings read from
//! them, credential wrapping, and logging setup.

pub mod config;
pub mod logging;
pub mod secret;

pub use config::{AppConfig, ConfigError, ConfigSource, EnvSource, MapSource};
pub use logging::{LogFormat, LogSettings, init_tracing, init_tracing_with};
pub use secret::Secret;
