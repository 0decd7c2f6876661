//! Decides which repository files are worth sending to the model.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::{
    errors::ReviewResult,
    provider::{RepoHandle, RepositoryContentProvider},
    target::ReviewTarget,
};

/// Upper bound of files looked at during a repository walk.
pub const MAX_SCANNED_FILES: usize = 50;

/// Upper bound of sub-directory listings during a repository walk, so trees
/// made mostly of directories still cost a bounded number of provider calls.
pub const MAX_LISTED_DIRECTORIES: usize = 100;

const SKIP_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".pdf", ".zip", ".tar", ".gz", ".pyc",
    ".min.js", ".min.css", ".woff", ".woff2", ".ttf", ".eot", ".mp3", ".mp4", ".mov", ".avi",
    ".exe", ".dll", ".so", ".dylib", ".class", ".jar",
];

const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules/",
    "venv/",
    "dist/",
    "build/",
    ".git/",
    "__pycache__/",
    ".idea/",
    ".vscode/",
];

/// `false` for media/archive/compiled files, minified bundles and anything
/// under build output, dependency caches, VCS metadata or IDE settings.
pub fn is_reviewable(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    if SKIP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return false;
    }
    !in_skipped_directory(path)
}

fn in_skipped_directory(path: &str) -> bool {
    SKIP_DIRECTORIES.iter().any(|dir| path.contains(dir))
}

/// A path chosen for review plus what the pull request says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub diff: Option<String>,
    pub is_new: bool,
    pub is_removed: bool,
}

impl SelectedFile {
    fn plain(path: String) -> Self {
        Self {
            path,
            diff: None,
            is_new: false,
            is_removed: false,
        }
    }
}

/// Picks the files to review for `target`.
///
/// - pull request: every touched file that passes [`is_reviewable`], in PR order
/// - repository with `explicit_paths`: that list filtered, caller order kept
/// - repository otherwise: breadth-first walk capped at [`MAX_SCANNED_FILES`]
pub async fn select_files<R: RepositoryContentProvider>(
    provider: &R,
    repo: &RepoHandle,
    target: &ReviewTarget,
    explicit_paths: Option<&[String]>,
) -> ReviewResult<Vec<SelectedFile>> {
    if let Some(pr) = target.pr_number {
        let files = provider.list_pull_request_files(repo, pr).await?;
        let total = files.len();
        let selected: Vec<SelectedFile> = files
            .into_iter()
            .filter(|f| {
                let keep = is_reviewable(&f.path);
                if !keep {
                    debug!(path = %f.path, "skipping non-reviewable file");
                }
                keep
            })
            .map(|f| SelectedFile {
                is_new: f.is_added(),
                is_removed: f.is_removed(),
                diff: f.patch.filter(|p| !p.is_empty()),
                path: f.path,
            })
            .collect();
        info!(pr, total, selected = selected.len(), "pull request files selected");
        return Ok(selected);
    }

    if let Some(paths) = explicit_paths.filter(|p| !p.is_empty()) {
        let selected: Vec<SelectedFile> = paths
            .iter()
            .filter(|p| is_reviewable(p))
            .cloned()
            .map(SelectedFile::plain)
            .collect();
        info!(requested = paths.len(), selected = selected.len(), "explicit files selected");
        return Ok(selected);
    }

    let paths = walk_repository(provider, repo, MAX_SCANNED_FILES).await?;
    Ok(paths.into_iter().map(SelectedFile::plain).collect())
}

/// Breadth-first walk from the root using an explicit queue.
///
/// Only files count toward `cap`; the walk stops as soon as `cap` files were
/// scanned. At most [`MAX_LISTED_DIRECTORIES`] sub-directories are listed.
/// Directories matching a skip marker are not expanded, and a failing
/// sub-directory listing is logged and skipped. A failing root listing is
/// returned as an error.
pub async fn walk_repository<R: RepositoryContentProvider>(
    provider: &R,
    repo: &RepoHandle,
    cap: usize,
) -> ReviewResult<Vec<String>> {
    let mut queue: VecDeque<_> = provider.list_tree_entries(repo, "").await?.into();
    let mut scanned = 0usize;
    let mut listed = 0usize;
    let mut selected = Vec::new();

    while scanned < cap {
        let Some(entry) = queue.pop_front() else {
            break;
        };

        if entry.is_directory {
            if in_skipped_directory(&format!("{}/", entry.path)) {
                debug!(dir = %entry.path, "not expanding excluded directory");
                continue;
            }
            if listed >= MAX_LISTED_DIRECTORIES {
                debug!(dir = %entry.path, "directory listing budget spent");
                continue;
            }
            listed += 1;
            match provider.list_tree_entries(repo, &entry.path).await {
                Ok(children) => queue.extend(children),
                Err(e) => warn!(dir = %entry.path, error = %e, "directory listing failed"),
            }
            continue;
        }

        scanned += 1;
        if is_reviewable(&entry.path) {
            selected.push(entry.path);
        }
    }

    if listed >= MAX_LISTED_DIRECTORIES {
        warn!(listed, "directory listing cap reached, walk truncated");
    }
    info!(scanned, listed, selected = selected.len(), "repository walk finished");
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        provider::PullRequestFile,
        testing::{FakeRepo, handle},
    };

    fn repo_target() -> ReviewTarget {
        ReviewTarget {
            owner: "octo".into(),
            repo_name: "demo".into(),
            pr_number: None,
        }
    }

    #[test]
    fn reviewable_examples() {
        assert!(!is_reviewable("images/logo.png"));
        assert!(!is_reviewable("node_modules/pkg/index.js"));
        assert!(!is_reviewable("dist/bundle.min.js"));
        assert!(!is_reviewable("assets/LOGO.PNG"));
        assert!(!is_reviewable("static/app.min.css"));
        assert!(is_reviewable("src/main.py"));
        assert!(is_reviewable("app/components/Button.js"));
        assert!(is_reviewable("Makefile"));
    }

    #[tokio::test]
    async fn pull_request_keeps_order_and_marks_status() {
        let repo = FakeRepo {
            pr_files: vec![
                PullRequestFile {
                    path: "b.rs".into(),
                    status: "added".into(),
                    patch: Some("@@ -0,0 +1 @@".into()),
                },
                PullRequestFile {
                    path: "logo.png".into(),
                    status: "modified".into(),
                    patch: None,
                },
                PullRequestFile {
                    path: "a.rs".into(),
                    status: "removed".into(),
                    patch: Some(String::new()),
                },
            ],
            ..Default::default()
        };
        let target = ReviewTarget {
            pr_number: Some(9),
            ..repo_target()
        };
        let explicit = vec!["ignored.rs".to_string()];

        let got = select_files(&repo, &handle(), &target, Some(&explicit))
            .await
            .unwrap();

        let paths: Vec<_> = got.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["b.rs", "a.rs"]);
        assert!(got[0].is_new);
        assert_eq!(got[0].diff.as_deref(), Some("@@ -0,0 +1 @@"));
        assert!(got[1].is_removed);
        assert_eq!(got[1].diff, None);
    }

    #[tokio::test]
    async fn explicit_paths_are_filtered_in_caller_order() {
        let repo = FakeRepo::default();
        let explicit: Vec<String> = ["z.py", "dist/x.js", "a.py"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let got = select_files(&repo, &handle(), &repo_target(), Some(&explicit))
            .await
            .unwrap();

        let paths: Vec<_> = got.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["z.py", "a.py"]);
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn walk_is_breadth_first_and_skips_vendor_dirs() {
        let repo = FakeRepo::default()
            .with_dir(
                "",
                &[
                    ("src", true),
                    ("node_modules", true),
                    ("README.md", false),
                    ("logo.png", false),
                ],
            )
            .with_dir("src", &[("src/lib.rs", false), ("src/util", true)])
            .with_dir("src/util", &[("src/util/mod.rs", false)]);

        let got = walk_repository(&repo, &handle(), MAX_SCANNED_FILES)
            .await
            .unwrap();

        assert_eq!(got, ["README.md", "src/lib.rs", "src/util/mod.rs"]);
        assert!(!repo.calls().contains(&"tree:node_modules".to_string()));
    }

    #[tokio::test]
    async fn walk_stops_at_cap_of_scanned_files() {
        let entries: Vec<(String, bool)> =
            (0..80).map(|i| (format!("f{i:02}.png"), false)).collect();
        let mut entries: Vec<(&str, bool)> =
            entries.iter().map(|(p, d)| (p.as_str(), *d)).collect();
        entries.push(("late.rs", false));
        let repo = FakeRepo::default().with_dir("", &entries);

        let got = walk_repository(&repo, &handle(), MAX_SCANNED_FILES)
            .await
            .unwrap();

        // 50 pngs scanned, none selected, `late.rs` never reached.
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn directory_only_tree_costs_bounded_listings() {
        let names: Vec<String> = (0..150).map(|i| format!("d{i:03}")).collect();
        let mut repo = FakeRepo::default();
        // Each directory holds only the next one; the last holds a file.
        for i in 0..names.len() {
            let parent = if i == 0 { "" } else { names[i - 1].as_str() };
            repo = repo.with_dir(parent, &[(names[i].as_str(), true)]);
        }
        repo = repo.with_dir(&names[149], &[("deep.rs", false)]);

        let got = walk_repository(&repo, &handle(), MAX_SCANNED_FILES)
            .await
            .unwrap();

        assert!(got.is_empty());
        let listings = repo.calls().iter().filter(|c| c.starts_with("tree:")).count();
        assert_eq!(listings, MAX_LISTED_DIRECTORIES + 1);
    }

    #[tokio::test]
    async fn failing_subdirectory_does_not_abort_walk() {
        let repo = FakeRepo {
            failing_dirs: vec!["broken".into()],
            ..Default::default()
        }
        .with_dir("", &[("broken", true), ("main.go", false)]);

        let got = walk_repository(&repo, &handle(), 10).await.unwrap();
        assert_eq!(got, ["main.go"]);
    }

    #[tokio::test]
    async fn failing_root_listing_is_an_error() {
        let repo = FakeRepo::default();
        assert!(walk_repository(&repo, &handle(), 10).await.is_err());
    }
}
