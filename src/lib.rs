//! Javelin - Java repository migration service
//!
//! This is the main binary crate that wires together all modules

mod app;

pub use app::{AppHandle, create_app};
pub use javelin_core::{Config, init_tracing};

// Re-export for convenience
pub use javelin_core;
pub use javelin_deps;
pub use javelin_orchestrator;
pub use javelin_rewrite;
