//! Deterministic synthetic completions.
//!
//! Used as the mock strategy and as the fallback when the live provider
//! fails. The text goes through the regular parser, so it must follow the
//! response schema and use only known labels.

use serde_json::{Value, json};

use crate::errors::DegradedReason;

const ISSUE_TEMPLATES: [(&str, &str); 3] = [
    ("Documentation needed", "documentation"),
    ("Consider refactoring", "refactor"),
    ("Add comments", "style"),
];

fn synthetic(paths: &[String], summary: String, note: &str) -> String {
    let issues: Vec<Value> = paths
        .iter()
        .zip(ISSUE_TEMPLATES)
        .map(|(path, (title, label))| {
            json!({
                "title": format!("{title} in {path}"),
                "file_path": path,
                "line_numbers": [1],
                "description": format!(
                    "This is a placeholder issue for demonstration purposes in {path}. {note}"
                ),
                "suggestion": "Enable live analysis by setting MOCK_MODE=false and configuring an LLM provider.",
                "code_example": "# This is placeholder code\nprint('Hello world')",
                "severity": "low",
                "labels": [label],
            })
        })
        .collect();

    let test_suggestions: Vec<Value> = paths
        .first()
        .map(|path| {
            json!({
                "file_path": path,
                "test_description": format!("This is a placeholder test suggestion. {note}"),
                "test_case_example": "# This is a placeholder test case\ndef test_example():\n    assert True",
            })
        })
        .into_iter()
        .collect();

    let suggested: Vec<&str> = ISSUE_TEMPLATES
        .iter()
        .take(paths.len().min(ISSUE_TEMPLATES.len()))
        .map(|(_, label)| *label)
        .collect();

    json!({
        "issues": issues,
        "test_suggestions": test_suggestions,
        "summary": summary,
        "suggested_labels": suggested,
    })
    .to_string()
}

/// Completion text for mock mode, built from the real selected paths.
pub fn mock_completion(paths: &[String]) -> String {
    synthetic(
        paths,
        format!(
            "This is a mock code review of {} files. Mock mode is enabled in the backend.",
            paths.len()
        ),
        "The backend is running in mock mode, so this is not a real finding.",
    )
}

/// Completion text used when the live provider failed.
pub fn fallback_completion(paths: &[String], reason: &DegradedReason) -> String {
    synthetic(
        paths,
        format!(
            "The language model could not be reached ({reason}). This placeholder review of {} files was generated locally.",
            paths.len()
        ),
        "The completion provider failed, so this is not a real finding.",
    )
}
