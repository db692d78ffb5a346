//! Javelin Orchestrator - HTTP API and job pipeline for Java repository migrations
//!
//! This crate owns the migration job lifecycle: a request is validated, a job
//! record is created in `pending`, and a background pipeline walks it through
//! clone, analysis, migration, tests, quality scan, push and notification.
//!
//! # Architecture
//!
//! ```text
//! javelin-orchestrator/
//! ├── presentation/     # HTTP layer
//! │   ├── controllers/  # Request handlers
//! │   ├── middleware.rs # Request logging, error mapping
//! │   ├── models.rs     # DTOs with OpenAPI schemas
//! │   └── routes.rs     # API route definitions
//! ├── application/      # Workflow, pipeline, orchestrator, preview
//! ├── infrastructure/   # Git, job store, SonarQube, SMTP, test runner, reports
//! └── domain/           # Job entity, status machine, collaborator traits
//! ```
//!
//! # API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/migration/start` | POST | Start a migration job |
//! | `/api/migration/preview` | POST | Dry-run a migration |
//! | `/api/migration/{id}` | GET | Job state |
//! | `/api/migration/{id}/logs` | GET | Job log lines |
//! | `/api/migration/{id}/cancel` | POST | Cancel a running job |
//! | `/api/migration/{id}/report` | GET | HTML report |
//! | `/api/migration/{id}/jmeter` | GET | JMeter test plan |
//! | `/api/migrations` | GET | All jobs |
//! | `/api/conversion-types` | GET | Conversion catalog |
//! | `/api/java-versions` | GET | Supported versions |
//! | `/api/openrewrite/recipes` | GET | Recipe catalog |
//! | `/health` | GET | Health check |

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
