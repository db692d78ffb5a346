//! Orchestrator API controllers

pub mod catalog;
pub mod health;
pub mod migrations;

use std::sync::Arc;

use crate::application::{Orchestrator, PreviewService};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub preview: Arc<PreviewService>,
    /// Diff entries returned by the preview endpoint
    pub max_file_diffs: usize,
    pub enable_docs: bool,
}
