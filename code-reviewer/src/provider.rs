//! Collaborator contracts the pipeline depends on.
//!
//! Both traits use native `async fn` in traits (returned futures are `Send`),
//! so implementations stay plain structs without boxing or `async-trait`.

use std::future::Future;

use crate::errors::{CompletionError, RepositoryError};

/// Opaque reference to a repository resolved by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    pub owner: String,
    pub repo: String,
    /// Default branch when the provider reports one.
    pub default_branch: Option<String>,
}

/// One file touched by a pull request, in provider enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestFile {
    pub path: String,
    /// Provider status string (`added`, `modified`, `removed`, `renamed`, ...).
    pub status: String,
    pub patch: Option<String>,
}

impl PullRequestFile {
    pub fn is_added(&self) -> bool {
        self.status == "added"
    }

    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub is_directory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub size_bytes: u64,
    pub raw_bytes: Vec<u8>,
}

/// Source of repository listings, file bytes and pull-request labels.
pub trait RepositoryContentProvider: Send + Sync {
    fn resolve_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<RepoHandle, RepositoryError>> + Send;

    /// Head commit of the pull request, used to pin file fetches.
    fn pull_request_head(
        &self,
        repo: &RepoHandle,
        pr_number: u64,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    fn list_pull_request_files(
        &self,
        repo: &RepoHandle,
        pr_number: u64,
    ) -> impl Future<Output = Result<Vec<PullRequestFile>, RepositoryError>> + Send;

    /// Direct children of `path`; the root is `""`.
    fn list_tree_entries(
        &self,
        repo: &RepoHandle,
        path: &str,
    ) -> impl Future<Output = Result<Vec<TreeEntry>, RepositoryError>> + Send;

    fn fetch_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        git_ref: Option<&str>,
    ) -> impl Future<Output = Result<FetchedFile, RepositoryError>> + Send;

    /// Creates the label when absent. Existing labels are left untouched.
    fn ensure_label(
        &self,
        repo: &RepoHandle,
        name: &str,
        color: &str,
        description: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn attach_label(
        &self,
        repo: &RepoHandle,
        pr_number: u64,
        name: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Parameters of a single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text-completion backend.
pub trait CompletionProvider: Send + Sync {
    fn complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}
