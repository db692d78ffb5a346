//! Git checkouts and repository publishing

mod hosting;
mod service;
pub mod token;

pub use hosting::{CreatedRepository, HostingApi};
pub use service::{GitService, GitServiceConfig};
pub use token::{current_request_git_token, with_request_git_token};
