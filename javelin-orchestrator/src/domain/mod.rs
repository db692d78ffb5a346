//! Orchestrator domain layer

pub mod entities;
pub mod request;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use request::{JobSpec, MigrationRequest, ValidationError, repository_name};
pub use services::*;
pub use value_objects::*;
