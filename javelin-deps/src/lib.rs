//! Javelin Deps - Build manifest analysis
//!
//! Reads Maven and Gradle build files and decides, per declared dependency,
//! whether a migration should move it to a newer coordinate.
//!
//! # Supported manifests
//!
//! | Build tool | Files |
//! |-----------|-------|
//! | Maven | `pom.xml` |
//! | Gradle | `build.gradle`, `build.gradle.kts` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use javelin_deps::{DependencyResolver, ParserFactory};
//!
//! let parser = ParserFactory::new().parser_for("pom.xml").unwrap();
//! let manifest = parser.parse(&pom_content)?;
//! let records = DependencyResolver::new().resolve_all(&manifest.dependencies);
//! ```
//!
//! # Architecture
//!
//! ```text
//! javelin-deps/
//! ├── domain/     # Manifest and dependency records
//! ├── parsers/    # pom.xml (quick-xml) and Gradle (regex) readers
//! └── services/   # Static upgrade table
//! ```

pub mod domain;
pub mod parsers;
pub mod services;

pub use domain::*;
pub use parsers::{GradleParser, ManifestParser, MavenParser, ParseError, ParserFactory};
pub use services::{DependencyResolver, Resolution};
