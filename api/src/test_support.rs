//! In-memory collaborators for route tests.

use code_reviewer::{
    RepositoryError,
    errors::CompletionError,
    provider::{
        CompletionProvider, CompletionRequest, FetchedFile, PullRequestFile, RepoHandle,
        RepositoryContentProvider, TreeEntry,
    },
};

const APP_PY: &str = "import db\n\ndef find(name):\n    return db.query(f\"select * from users where name = '{name}'\")\n";

/// One-file repository `src/app.py`; owner `missing` does not exist.
#[derive(Debug, Clone, Default)]
pub struct StubRepo;

impl RepositoryContentProvider for StubRepo {
    async fn resolve_repository(&self, owner: &str, repo: &str) -> Result<RepoHandle, RepositoryError> {
        if owner == "missing" {
            return Err(RepositoryError::NotFound(format!("{owner}/{repo}")));
        }
        Ok(RepoHandle {
            owner: owner.to_string(),
            repo: repo.to_string(),
            default_branch: Some("main".to_string()),
        })
    }

    async fn pull_request_head(
        &self,
        _repo: &RepoHandle,
        _pr_number: u64,
    ) -> Result<Option<String>, RepositoryError> {
        Ok(Some("abc123".to_string()))
    }

    async fn list_pull_request_files(
        &self,
        _repo: &RepoHandle,
        _pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, RepositoryError> {
        Ok(vec![PullRequestFile {
            path: "src/app.py".to_string(),
            status: "modified".to_string(),
            patch: Some("@@ -1 +1 @@\n-import sqlite3\n+import db".to_string()),
        }])
    }

    async fn list_tree_entries(
        &self,
        _repo: &RepoHandle,
        path: &str,
    ) -> Result<Vec<TreeEntry>, RepositoryError> {
        let entries = match path {
            "" => vec![TreeEntry {
                path: "src".to_string(),
                is_directory: true,
            }],
            "src" => vec![TreeEntry {
                path: "src/app.py".to_string(),
                is_directory: false,
            }],
            other => return Err(RepositoryError::NotFound(other.to_string())),
        };
        Ok(entries)
    }

    async fn fetch_file(
        &self,
        _repo: &RepoHandle,
        path: &str,
        _git_ref: Option<&str>,
    ) -> Result<FetchedFile, RepositoryError> {
        if path != "src/app.py" {
            return Err(RepositoryError::NotFound(path.to_string()));
        }
        Ok(FetchedFile {
            size_bytes: APP_PY.len() as u64,
            raw_bytes: APP_PY.as_bytes().to_vec(),
        })
    }

    async fn ensure_label(
        &self,
        _repo: &RepoHandle,
        _name: &str,
        _color: &str,
        _description: &str,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn attach_label(
        &self,
        _repo: &RepoHandle,
        _pr_number: u64,
        _name: &str,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Completion stub returning a fixed reply or a fixed failure.
#[derive(Debug, Clone)]
pub struct StubCompletion {
    reply: Result<String, String>,
}

impl StubCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err("upstream returned 503".to_string()),
        }
    }
}

impl CompletionProvider for StubCompletion {
    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        self.reply.clone().map_err(CompletionError)
    }
}
