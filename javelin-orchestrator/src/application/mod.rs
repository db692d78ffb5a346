//! Orchestrator application layer

pub mod orchestrator;
pub mod pipeline;
pub mod preview;
pub mod workflow;

pub use orchestrator::{Orchestrator, OrchestratorError};
pub use pipeline::{Collaborators, MigrationPipeline, PipelineError};
pub use preview::{PreviewError, PreviewOutcome, PreviewService};
pub use workflow::{JobWorkflow, WorkflowError};
