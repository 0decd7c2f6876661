//! GitHub access for the code reviewer: repository listings, file contents,
//! pull-request files and labels over the REST v3 API.

pub mod errors;
pub mod git_providers;

pub use errors::{GitContextEngineError, GitContextEngineResult};
pub use git_providers::{ProviderConfig, github::GitHubClient};
