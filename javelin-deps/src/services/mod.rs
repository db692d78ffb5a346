//! Dependency services

pub mod resolver;

pub use resolver::{DependencyResolver, Resolution};
