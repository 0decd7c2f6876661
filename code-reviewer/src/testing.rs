//! In-memory collaborators for unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    errors::{CompletionError, RepositoryError},
    provider::{
        CompletionProvider, CompletionRequest, FetchedFile, PullRequestFile, RepoHandle,
        RepositoryContentProvider, TreeEntry,
    },
};

/// Repository fake. Every call is appended to `calls` as `op:arg`.
#[derive(Debug, Clone, Default)]
pub struct FakeRepo {
    pub head: Option<String>,
    pub pr_files: Vec<PullRequestFile>,
    pub tree: HashMap<String, Vec<TreeEntry>>,
    pub files: HashMap<String, Vec<u8>>,
    pub failing_dirs: Vec<String>,
    pub fail_labels: bool,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRepo {
    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn with_dir(mut self, dir: &str, entries: &[(&str, bool)]) -> Self {
        self.tree.insert(
            dir.to_string(),
            entries
                .iter()
                .map(|(p, d)| TreeEntry {
                    path: p.to_string(),
                    is_directory: *d,
                })
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn handle() -> RepoHandle {
    RepoHandle {
        owner: "octo".into(),
        repo: "demo".into(),
        default_branch: Some("main".into()),
    }
}

impl RepositoryContentProvider for FakeRepo {
    async fn resolve_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepoHandle, RepositoryError> {
        self.record(format!("resolve:{owner}/{repo}"));
        if owner == "missing" {
            return Err(RepositoryError::NotFound(format!("{owner}/{repo}")));
        }
        Ok(RepoHandle {
            owner: owner.to_string(),
            repo: repo.to_string(),
            default_branch: Some("main".into()),
        })
    }

    async fn pull_request_head(
        &self,
        _repo: &RepoHandle,
        pr_number: u64,
    ) -> Result<Option<String>, RepositoryError> {
        self.record(format!("head:{pr_number}"));
        Ok(self.head.clone())
    }

    async fn list_pull_request_files(
        &self,
        _repo: &RepoHandle,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, RepositoryError> {
        self.record(format!("pr_files:{pr_number}"));
        Ok(self.pr_files.clone())
    }

    async fn list_tree_entries(
        &self,
        _repo: &RepoHandle,
        path: &str,
    ) -> Result<Vec<TreeEntry>, RepositoryError> {
        self.record(format!("tree:{path}"));
        if self.failing_dirs.iter().any(|d| d == path) {
            return Err(RepositoryError::Transport("boom".into()));
        }
        self.tree
            .get(path)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(path.to_string()))
    }

    async fn fetch_file(
        &self,
        _repo: &RepoHandle,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FetchedFile, RepositoryError> {
        self.record(format!("fetch:{path}@{}", git_ref.unwrap_or("-")));
        let bytes = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(path.to_string()))?;
        Ok(FetchedFile {
            size_bytes: bytes.len() as u64,
            raw_bytes: bytes,
        })
    }

    async fn ensure_label(
        &self,
        _repo: &RepoHandle,
        name: &str,
        color: &str,
        _description: &str,
    ) -> Result<(), RepositoryError> {
        self.record(format!("ensure_label:{name}:{color}"));
        if self.fail_labels {
            return Err(RepositoryError::Forbidden);
        }
        Ok(())
    }

    async fn attach_label(
        &self,
        _repo: &RepoHandle,
        pr_number: u64,
        name: &str,
    ) -> Result<(), RepositoryError> {
        self.record(format!("attach_label:{pr_number}:{name}"));
        Ok(())
    }
}

/// Completion fake returning a canned reply and recording prompts.
#[derive(Debug, Clone)]
pub struct FakeCompletion {
    pub reply: Result<String, CompletionError>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: Err(CompletionError(msg.to_string())),
            prompts: Arc::default(),
        }
    }
}

impl CompletionProvider for FakeCompletion {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        self.reply.clone()
    }
}
