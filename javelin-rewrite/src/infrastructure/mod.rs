//! Rewrite infrastructure
//!
//! - Rules: the built-in detection, rewrite and generation catalog
//! - Rewriter: applies one rewrite rule to file content
//! - Discovery: which files each rule kind reads
//! - Store: disk or in-memory overlay for pass output
//! - Encoding: decoding legacy source encodings

pub mod discovery;
pub mod encoding;
pub mod generators;
pub mod regex_cache;
pub mod rewriter;
pub mod rules;
pub mod store;

pub use discovery::{SourceDiscovery, SourceFile};
pub use rewriter::{RewriteContext, Rewritten, apply_rule};
pub use rules::{Recipe, RuleCatalog, recipe_catalog, recipes_for};
pub use store::{DiskStore, OverlayStore, SourceStore};
