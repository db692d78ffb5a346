//! Javelin Core - Foundation crate for the Javelin migration service
//!
//! This crate provides the pieces every other Javelin crate leans on:
//!
//! # Modules
//!
//! - [`config`] - Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] - Shared vocabulary: Java versions, conversion types, severities
//! - [`logging`] - Structured logging with tracing
//!
//! # Configuration
//!
//! Load configuration from files and environment:
//!
//! ```rust,ignore
//! use javelin_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `JAVELIN__` prefix with double underscore separators:
//!
//! ```bash
//! JAVELIN__SERVER__PORT=8001
//! JAVELIN__PIPELINE__MAX_CONCURRENT_JOBS=4
//! ```
//!
//! # Logging
//!
//! ```rust,ignore
//! use javelin_core::{Config, init_tracing};
//!
//! let config = Config::load()?;
//! init_tracing(&config.logging)?;
//! ```

pub mod config;
pub mod domain;
pub mod logging;

pub use config::Config;
pub use domain::{ConversionType, Severity, parse_java_version};
pub use logging::init_tracing;
