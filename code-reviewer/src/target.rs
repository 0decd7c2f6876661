//! GitHub URL → [`ReviewTarget`].

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{Error, ReviewResult};

lazy_static! {
    static ref PR_URL: Regex =
        Regex::new(r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/\s]+)/pull/(\d+)").unwrap();
    static ref REPO_URL: Regex =
        Regex::new(r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/?#\s]+)").unwrap();
}

/// Repository or pull request a review runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub owner: String,
    pub repo_name: String,
    /// Present iff the source URL was a pull-request URL.
    pub pr_number: Option<u64>,
}

impl ReviewTarget {
    pub fn is_pull_request(&self) -> bool {
        self.pr_number.is_some()
    }
}

/// Parses a pull-request URL (`.../owner/repo/pull/N`) or a repository URL
/// (`.../owner/repo`). The pull-request form is tried first.
///
/// Owner and repository segments are kept verbatim. A trailing `.git` on a
/// bare repository URL is not a separate segment and is kept as well.
pub fn resolve(url: &str) -> ReviewResult<ReviewTarget> {
    let url = url.trim();

    if let Some(c) = PR_URL.captures(url) {
        let pr_number = c[3]
            .parse::<u64>()
            .map_err(|_| Error::InvalidUrl(url.to_string()))?;
        return Ok(ReviewTarget {
            owner: c[1].to_string(),
            repo_name: c[2].to_string(),
            pr_number: Some(pr_number),
        });
    }

    if let Some(c) = REPO_URL.captures(url) {
        return Ok(ReviewTarget {
            owner: c[1].to_string(),
            repo_name: c[2].to_string(),
            pr_number: None,
        });
    }

    Err(Error::InvalidUrl(url.to_string()))
}
