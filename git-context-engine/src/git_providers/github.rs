//! GitHub provider (REST v3) for repository contents, PR files and labels.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}
//!   * GET  /repos/{owner}/{repo}/pulls/{number}
//!   * GET  /repos/{owner}/{repo}/pulls/{number}/files?per_page=100&page={n}
//!   * GET  /repos/{owner}/{repo}/contents/{path}?ref={ref}
//!   * GET  /repos/{owner}/{repo}/labels/{name}
//!   * POST /repos/{owner}/{repo}/labels
//!   * POST /repos/{owner}/{repo}/issues/{number}/labels

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use code_reviewer::{
    RepositoryError,
    provider::{FetchedFile, PullRequestFile, RepoHandle, RepositoryContentProvider, TreeEntry},
};
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
    errors::{
        GitContextEngineConfigError, GitContextEngineError, GitContextEngineProviderError,
        GitContextEngineResult,
    },
    git_providers::ProviderConfig,
};

const PER_PAGE: usize = 100;
/// GitHub stops listing PR files after 3000 entries.
const MAX_PR_FILE_PAGES: usize = 30;

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
}

impl GitHubClient {
    /// Builds a client with the GitHub media type, API version and optional
    /// bearer token set as default headers.
    pub fn from_config(cfg: ProviderConfig) -> GitContextEngineResult<Self> {
        cfg.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        if let Some(token) = &cfg.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GitContextEngineConfigError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent("code-review-assistant/0.1")
            .default_headers(headers)
            .build()?;

        let base_api = cfg.base_api.trim().trim_end_matches('/').to_string();
        debug!(%base_api, authenticated = cfg.token.is_some(), "GitHubClient created");
        Ok(Self { http, base_api })
    }

    fn repo_url(&self, repo: &RepoHandle) -> String {
        format!(
            "{}/repos/{}/{}",
            self.base_api,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.repo)
        )
    }

    fn contents_url(&self, repo: &RepoHandle, path: &str) -> String {
        let path = encode_path(path);
        if path.is_empty() {
            format!("{}/contents", self.repo_url(repo))
        } else {
            format!("{}/contents/{path}", self.repo_url(repo))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> GitContextEngineResult<T> {
        debug!(%url, "GitHub GET");
        let resp = self.http.get(url).query(query).send().await?;
        let body = check(resp)?.json::<T>().await?;
        Ok(body)
    }

    /// Confirms the repository exists and reads its default branch.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> GitContextEngineResult<RepoHandle> {
        let mut handle = RepoHandle {
            owner: owner.to_string(),
            repo: repo.to_string(),
            default_branch: None,
        };
        let info: GitHubRepo = self.get_json(&self.repo_url(&handle), &[]).await?;
        handle.default_branch = info.default_branch;
        Ok(handle)
    }

    pub async fn get_pull_head_sha(
        &self,
        repo: &RepoHandle,
        number: u64,
    ) -> GitContextEngineResult<Option<String>> {
        let url = format!("{}/pulls/{number}", self.repo_url(repo));
        let pr: GitHubPr = self.get_json(&url, &[]).await?;
        Ok(pr.head.map(|h| h.sha).filter(|s| !s.is_empty()))
    }

    /// All files of a pull request, following pagination.
    pub async fn get_pull_files(
        &self,
        repo: &RepoHandle,
        number: u64,
    ) -> GitContextEngineResult<Vec<PullRequestFile>> {
        let url = format!("{}/pulls/{number}/files", self.repo_url(repo));
        let per_page = PER_PAGE.to_string();
        let mut out = Vec::new();

        for page in 1..=MAX_PR_FILE_PAGES {
            let page_str = page.to_string();
            let batch: Vec<GitHubPrFile> = self
                .get_json(&url, &[("per_page", per_page.as_str()), ("page", page_str.as_str())])
                .await?;
            let last = batch.len() < PER_PAGE;
            out.extend(batch.into_iter().map(|f| PullRequestFile {
                path: f.filename,
                status: f.status,
                patch: f.patch,
            }));
            if last {
                break;
            }
        }

        debug!(pr = number, files = out.len(), "GitHub PR files listed");
        Ok(out)
    }

    /// Direct children of a directory (`""` is the root).
    pub async fn get_directory(
        &self,
        repo: &RepoHandle,
        path: &str,
    ) -> GitContextEngineResult<Vec<TreeEntry>> {
        let contents: GitHubContents = self.get_json(&self.contents_url(repo, path), &[]).await?;
        match contents {
            GitHubContents::Listing(entries) => Ok(entries
                .into_iter()
                .map(|e| TreeEntry {
                    is_directory: e.kind == "dir",
                    path: e.path,
                })
                .collect()),
            GitHubContents::File(f) => Err(GitContextEngineProviderError::InvalidResponse(
                format!("expected a directory at '{}', got {}", path, f.kind),
            )
            .into()),
        }
    }

    /// File bytes at `git_ref` (default branch when `None`).
    ///
    /// Files above GitHub's inline limit come back with `encoding: none` and
    /// no content; the reported size is still returned.
    pub async fn get_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        git_ref: Option<&str>,
    ) -> GitContextEngineResult<FetchedFile> {
        let query: Vec<(&str, &str)> = git_ref.map(|r| ("ref", r)).into_iter().collect();
        let contents: GitHubContents = self.get_json(&self.contents_url(repo, path), &query).await?;
        let file = match contents {
            GitHubContents::File(f) => f,
            GitHubContents::Listing(_) => {
                return Err(GitContextEngineProviderError::InvalidResponse(format!(
                    "'{path}' is a directory"
                ))
                .into());
            }
        };

        let raw_bytes = match (file.encoding.as_deref(), file.content.as_deref()) {
            (Some("base64"), Some(content)) => decode_base64(content)?,
            (_, Some(content)) if file.encoding.is_none() => content.as_bytes().to_vec(),
            _ => Vec::new(),
        };

        Ok(FetchedFile {
            size_bytes: file.size,
            raw_bytes,
        })
    }

    /// Creates the label unless it already exists.
    pub async fn create_label_if_missing(
        &self,
        repo: &RepoHandle,
        name: &str,
        color: &str,
        description: &str,
    ) -> GitContextEngineResult<()> {
        let url = format!("{}/labels/{}", self.repo_url(repo), urlencoding::encode(name));
        match check(self.http.get(&url).send().await?) {
            Ok(_) => {
                debug!(label = name, "label already exists");
                return Ok(());
            }
            Err(GitContextEngineError::Provider(GitContextEngineProviderError::NotFound(_))) => {}
            Err(e) => return Err(e),
        }

        let resp = self
            .http
            .post(format!("{}/labels", self.repo_url(repo)))
            .json(&GitHubLabelCreate {
                name,
                color,
                description,
            })
            .send()
            .await?;
        if resp.status() == StatusCode::UNPROCESSABLE_ENTITY {
            debug!(label = name, "label was created concurrently");
            return Ok(());
        }
        check(resp)?;
        info!(label = name, color, "label created");
        Ok(())
    }

    pub async fn add_label_to_pull(
        &self,
        repo: &RepoHandle,
        number: u64,
        name: &str,
    ) -> GitContextEngineResult<()> {
        let url = format!("{}/issues/{number}/labels", self.repo_url(repo));
        let resp = self
            .http
            .post(url)
            .json(&GitHubLabelsAdd { labels: [name] })
            .send()
            .await?;
        check(resp)?;
        Ok(())
    }
}

impl RepositoryContentProvider for GitHubClient {
    async fn resolve_repository(&self, owner: &str, repo: &str) -> Result<RepoHandle, RepositoryError> {
        Ok(self.get_repository(owner, repo).await?)
    }

    async fn pull_request_head(
        &self,
        repo: &RepoHandle,
        pr_number: u64,
    ) -> Result<Option<String>, RepositoryError> {
        Ok(self.get_pull_head_sha(repo, pr_number).await?)
    }

    async fn list_pull_request_files(
        &self,
        repo: &RepoHandle,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, RepositoryError> {
        Ok(self.get_pull_files(repo, pr_number).await?)
    }

    async fn list_tree_entries(
        &self,
        repo: &RepoHandle,
        path: &str,
    ) -> Result<Vec<TreeEntry>, RepositoryError> {
        Ok(self.get_directory(repo, path).await?)
    }

    async fn fetch_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FetchedFile, RepositoryError> {
        Ok(self.get_file(repo, path, git_ref).await?)
    }

    async fn ensure_label(
        &self,
        repo: &RepoHandle,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<(), RepositoryError> {
        Ok(self.create_label_if_missing(repo, name, color, description).await?)
    }

    async fn attach_label(
        &self,
        repo: &RepoHandle,
        pr_number: u64,
        name: &str,
    ) -> Result<(), RepositoryError> {
        Ok(self.add_label_to_pull(repo, pr_number, name).await?)
    }
}

/// Passes 2xx responses through, maps everything else to a provider error.
fn check(resp: Response) -> GitContextEngineResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let retry_after = retry_after_secs(resp.headers());
    warn!(%status, %url, ?retry_after, "GitHub request failed");
    Err(GitContextEngineProviderError::from_status(status.as_u16(), &url, retry_after).into())
}

/// `Retry-After`, or the time until `X-RateLimit-Reset` when the quota is spent.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    if let Some(secs) = header("retry-after").and_then(|v| v.trim().parse().ok()) {
        return Some(secs);
    }
    if header("x-ratelimit-remaining") == Some("0") {
        let reset: u64 = header("x-ratelimit-reset")?.trim().parse().ok()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        return Some(reset.saturating_sub(now));
    }
    None
}

fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_base64(content: &str) -> GitContextEngineResult<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact).map_err(|e| {
        GitContextEngineProviderError::InvalidResponse(format!("bad base64 content: {e}")).into()
    })
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubPr {
    head: Option<GitHubRef>,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPrFile {
    filename: String,
    status: String,
    patch: Option<String>,
}

/// `/contents` answers with an array for directories and an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GitHubContents {
    Listing(Vec<GitHubContentEntry>),
    File(GitHubFileContent),
}

#[derive(Debug, Deserialize)]
struct GitHubContentEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GitHubFileContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
    encoding: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct GitHubLabelCreate<'a> {
    name: &'a str,
    color: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct GitHubLabelsAdd<'a> {
    labels: [&'a str; 1],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path, query_param},
    };

    async fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::from_config(ProviderConfig {
            base_api: server.uri(),
            token: Some("t0ken".into()),
        })
        .unwrap()
    }

    fn handle() -> RepoHandle {
        RepoHandle {
            owner: "octo".into(),
            repo: "demo".into(),
            default_branch: Some("main".into()),
        }
    }

    #[test]
    fn paths_are_encoded_per_segment() {
        assert_eq!(encode_path("src/my file.rs"), "src/my%20file.rs");
        assert_eq!(encode_path("/a//b/"), "a/b");
        assert_eq!(encode_path(""), "");
    }

    #[tokio::test]
    async fn file_content_is_base64_decoded_at_ref() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/src/main.py"))
            .and(query_param("ref", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "size": 12,
                "encoding": "base64",
                "content": "cHJpbnQo\nMSkK\n"
            })))
            .mount(&server)
            .await;

        let f = client(&server)
            .await
            .fetch_file(&handle(), "src/main.py", Some("abc"))
            .await
            .unwrap();

        assert_eq!(f.raw_bytes, b"print(1)\n");
        assert_eq!(f.size_bytes, 12);
    }

    #[tokio::test]
    async fn root_listing_marks_directories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"path": "src", "type": "dir"},
                {"path": "README.md", "type": "file"}
            ])))
            .mount(&server)
            .await;

        let entries = client(&server)
            .await
            .list_tree_entries(&handle(), "")
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_directory);
        assert!(!entries[1].is_directory);
    }

    #[tokio::test]
    async fn pr_files_follow_pagination() {
        let server = MockServer::start().await;
        let full: Vec<_> = (0..100)
            .map(|i| json!({"filename": format!("f{i}.rs"), "status": "modified", "patch": "@@"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/pulls/4/files"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(full)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/pulls/4/files"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"filename": "new.rs", "status": "added"}
            ])))
            .mount(&server)
            .await;

        let files = client(&server)
            .await
            .list_pull_request_files(&handle(), 4)
            .await
            .unwrap();

        assert_eq!(files.len(), 101);
        assert!(files[100].is_added());
        assert_eq!(files[100].patch, None);
    }

    #[tokio::test]
    async fn missing_repository_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .resolve_repository("octo", "nope")
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/pulls/1"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .pull_request_head(&handle(), 1)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::RateLimited {
                retry_after_secs: Some(30)
            }
        ));
    }

    #[tokio::test]
    async fn missing_label_is_created_then_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/labels/test_coverage"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/demo/labels"))
            .and(body_json(json!({
                "name": "test_coverage",
                "color": "fbca04",
                "description": "AI-detected test_coverage issue"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/demo/issues/8/labels"))
            .and(body_json(json!({"labels": ["test_coverage"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let gh = client(&server).await;
        gh.ensure_label(&handle(), "test_coverage", "fbca04", "AI-detected test_coverage issue")
            .await
            .unwrap();
        gh.attach_label(&handle(), 8, "test_coverage").await.unwrap();
    }
}
