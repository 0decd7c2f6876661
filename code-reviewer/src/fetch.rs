//! Turns selected paths into [`FileSnapshot`]s.
//!
//! Nothing here fails: every per-file problem becomes a bracketed placeholder
//! in `content` so one bad file never blocks the batch.

use tracing::{debug, warn};

use crate::{
    provider::{FetchedFile, RepoHandle, RepositoryContentProvider},
    report::FileSnapshot,
    select::SelectedFile,
};

/// Files above this size are not decoded.
pub const OVERSIZE_THRESHOLD_BYTES: u64 = 500_000;

/// Share of U+FFFD in a lossy decode above which the file counts as binary.
const MAX_REPLACEMENT_RATIO: f64 = 0.10;

/// Decodes fetched bytes into reviewable text or a placeholder.
///
/// Order: size check, strict UTF-8, lossy UTF-8. Text containing NUL bytes or
/// a lossy decode dominated by replacement characters is treated as binary.
pub fn decode_contents(path: &str, file: &FetchedFile) -> String {
    if file.size_bytes > OVERSIZE_THRESHOLD_BYTES {
        warn!(path, size = file.size_bytes, "skipping large file");
        return format!(
            "[File too large to analyze: {path} ({} bytes)]",
            file.size_bytes
        );
    }

    let bytes = &file.raw_bytes;
    if bytes.contains(&0) {
        return binary_placeholder(path);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!(path, "file is not valid UTF-8, decoding lossily");
            let text = String::from_utf8_lossy(bytes);
            let total = text.chars().count().max(1);
            let replaced = text.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count();
            if replaced as f64 / total as f64 > MAX_REPLACEMENT_RATIO {
                binary_placeholder(path)
            } else {
                text.into_owned()
            }
        }
    }
}

fn binary_placeholder(path: &str) -> String {
    warn!(path, "file appears to be binary");
    format!("[Binary file not displayed: {path}]")
}

/// Fetches every selected file sequentially, pinned to `git_ref` when given.
///
/// Output order equals input order. Removed pull-request files are not
/// fetched.
pub async fn fetch_snapshots<R: RepositoryContentProvider>(
    provider: &R,
    repo: &RepoHandle,
    selected: &[SelectedFile],
    git_ref: Option<&str>,
) -> Vec<FileSnapshot> {
    let mut out = Vec::with_capacity(selected.len());

    for file in selected {
        let content = if file.is_removed {
            format!("[File removed in this pull request: {}]", file.path)
        } else {
            match provider.fetch_file(repo, &file.path, git_ref).await {
                Ok(fetched) => {
                    debug!(path = %file.path, size = fetched.size_bytes, "file fetched");
                    decode_contents(&file.path, &fetched)
                }
                Err(e) => {
                    warn!(path = %file.path, error = %e, "error retrieving file");
                    format!("[Error retrieving file: {} ({e})]", file.path)
                }
            }
        };

        out.push(FileSnapshot {
            path: file.path.clone(),
            content,
            diff: file.diff.clone(),
            is_new: file.is_new,
        });
    }

    out
}
