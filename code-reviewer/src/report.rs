//! Review data model shared by the pipeline, the HTTP surface and the renderers.
//!
//! Field names serialize in `snake_case` so the JSON shape of `/review` and
//! `/export-review` matches what existing frontends send and expect.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::UnknownLabelError;

/// Voice the model is asked to review in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTone {
    Strict,
    Mentor,
    #[default]
    Neutral,
}

impl ReviewTone {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewTone::Strict => "strict",
            ReviewTone::Mentor => "mentor",
            ReviewTone::Neutral => "neutral",
        }
    }
}

impl FromStr for ReviewTone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ReviewTone::Strict),
            "mentor" => Ok(ReviewTone::Mentor),
            "neutral" => Ok(ReviewTone::Neutral),
            _ => Err(()),
        }
    }
}

/// Per-request knobs. Missing JSON fields take the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    pub tone: ReviewTone,
    pub apply_labels: bool,
    pub include_test_suggestions: bool,
    pub include_summary: bool,
    pub max_issues: u32,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            tone: ReviewTone::Neutral,
            apply_labels: false,
            include_test_suggestions: true,
            include_summary: true,
            max_issues: 10,
        }
    }
}

/// Closed set of issue categories.
///
/// `Error` is reserved for the degraded report produced when the model output
/// cannot be parsed; prompts never offer it to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueLabel {
    Security,
    Style,
    Refactor,
    TestCoverage,
    Performance,
    Documentation,
    Bug,
    Error,
}

impl IssueLabel {
    pub const ALL: [IssueLabel; 8] = [
        IssueLabel::Security,
        IssueLabel::Style,
        IssueLabel::Refactor,
        IssueLabel::TestCoverage,
        IssueLabel::Performance,
        IssueLabel::Documentation,
        IssueLabel::Bug,
        IssueLabel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueLabel::Security => "security",
            IssueLabel::Style => "style",
            IssueLabel::Refactor => "refactor",
            IssueLabel::TestCoverage => "test_coverage",
            IssueLabel::Performance => "performance",
            IssueLabel::Documentation => "documentation",
            IssueLabel::Bug => "bug",
            IssueLabel::Error => "error",
        }
    }
}

impl fmt::Display for IssueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueLabel {
    type Err = UnknownLabelError;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueLabel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLabelError(s.to_string()))
    }
}

/// One finding reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub line_numbers: Vec<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub code_example: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<IssueLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuggestion {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub test_description: String,
    #[serde(default)]
    pub test_case_example: Option<String>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub test_suggestions: Vec<TestSuggestion>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub suggested_labels: BTreeSet<IssueLabel>,
    #[serde(default)]
    pub total_files_analyzed: usize,
    #[serde(default)]
    pub analysis_time_seconds: f64,
}

impl ReviewReport {
    /// Every label referenced by any issue, deduplicated.
    pub fn issue_labels(&self) -> BTreeSet<IssueLabel> {
        self.issues
            .iter()
            .flat_map(|i| i.labels.iter().copied())
            .collect()
    }
}

/// Decoded file handed to the prompt builder.
///
/// `content` is either the file text or a bracketed placeholder describing
/// why the text is not available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub path: String,
    pub content: String,
    pub diff: Option<String>,
    pub is_new: bool,
}
