use code_reviewer::ReviewSettings;
use serde::Deserialize;

/// Body of `POST /review`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// GitHub repository or pull request URL.
    pub url: String,
    /// Restricts the review to these paths; ignored for pull requests.
    #[serde(default)]
    pub file_paths: Option<Vec<String>>,
    #[serde(default)]
    pub settings: Option<ReviewSettings>,
}
