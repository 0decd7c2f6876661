//! Human-readable rendering of a [`ReviewReport`].

use std::fmt::Write;

use crate::report::{Issue, ReviewReport, TestSuggestion};

/// Renders the report as Markdown.
///
/// Section order is fixed: title, summary (only when non-empty), issues,
/// test suggestions, metadata. User text is copied verbatim; code blocks use
/// a fence longer than any backtick run inside them.
pub fn render(report: &ReviewReport) -> String {
    let mut out = String::from("# Code Review Report\n\n");

    if let Some(summary) = report.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        let _ = write!(out, "## Summary\n\n{summary}\n\n");
    }

    let _ = write!(out, "## Issues Found ({})\n\n", report.issues.len());
    for (i, issue) in report.issues.iter().enumerate() {
        render_issue(&mut out, i + 1, issue);
    }

    let _ = write!(
        out,
        "## Test Suggestions ({})\n\n",
        report.test_suggestions.len()
    );
    for (i, test) in report.test_suggestions.iter().enumerate() {
        render_test(&mut out, i + 1, test);
    }

    let _ = write!(
        out,
        "---\n\n_Files analyzed: {} | Analysis time: {:.2} seconds_\n",
        report.total_files_analyzed, report.analysis_time_seconds
    );
    out
}

fn render_issue(out: &mut String, n: usize, issue: &Issue) {
    let _ = write!(out, "### {n}. {}\n\n", issue.title);
    if !issue.file_path.is_empty() {
        let _ = write!(out, "**File:** {}\n\n", inline_code(&issue.file_path));
    }
    if !issue.line_numbers.is_empty() {
        let lines = issue
            .line_numbers
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "**Line(s):** {lines}\n\n");
    }
    if !issue.description.is_empty() {
        let _ = write!(out, "{}\n\n", issue.description);
    }
    if let Some(suggestion) = issue.suggestion.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "**Suggestion:** {suggestion}\n\n");
    }
    if let Some(code) = issue.code_example.as_deref().filter(|s| !s.is_empty()) {
        code_block(out, code);
    }
    // Labels close the block, after the code example.
    if !issue.labels.is_empty() {
        let labels = issue
            .labels
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "**Labels:** {labels}\n\n");
    }
    if let Some(severity) = issue.severity.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "**Severity:** {severity}\n\n");
    }
}

fn render_test(out: &mut String, n: usize, test: &TestSuggestion) {
    let _ = write!(out, "### Test {n}: {}\n\n", test.file_path);
    if !test.test_description.is_empty() {
        let _ = write!(out, "{}\n\n", test.test_description);
    }
    if let Some(code) = test.test_case_example.as_deref().filter(|s| !s.is_empty()) {
        code_block(out, code);
    }
}

fn longest_backtick_run(s: &str) -> usize {
    s.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

fn code_block(out: &mut String, code: &str) {
    let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);
    let _ = write!(out, "{fence}\n{code}\n{fence}\n\n");
}

fn inline_code(s: &str) -> String {
    let run = longest_backtick_run(s);
    if run == 0 {
        format!("`{s}`")
    } else {
        let ticks = "`".repeat(run + 1);
        format!("{ticks} {s} {ticks}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::report::IssueLabel;

    fn sample(summary: Option<&str>) -> ReviewReport {
        ReviewReport {
            issues: vec![Issue {
                title: "Security vulnerability".into(),
                file_path: "database.py".into(),
                line_numbers: vec![45, 46],
                description: "SQL injection risk".into(),
                suggestion: Some("Use parameterized queries".into()),
                code_example: Some(
                    "cursor.execute('SELECT * FROM users WHERE id = %s', (user_id,))".into(),
                ),
                labels: BTreeSet::from([IssueLabel::Security]),
                severity: Some("high".into()),
            }],
            test_suggestions: vec![TestSuggestion {
                file_path: "auth.py".into(),
                test_description: "Test authentication flow".into(),
                test_case_example: Some(
                    "def test_auth():\n    assert authenticate('user', 'pass') == True".into(),
                ),
            }],
            summary: summary.map(str::to_string),
            suggested_labels: BTreeSet::from([IssueLabel::Security]),
            total_files_analyzed: 2,
            analysis_time_seconds: 1.5,
        }
    }

    #[test]
    fn report_sections_and_fields_are_present() {
        let md = render(&sample(Some("The code has security issues that need to be addressed")));
        assert!(md.starts_with("# Code Review Report\n"));
        assert!(md.contains("## Summary\n\nThe code has security issues"));
        assert!(md.contains("## Issues Found (1)"));
        assert!(md.contains("### 1. Security vulnerability"));
        assert!(md.contains("**File:** `database.py`"));
        assert!(md.contains("**Line(s):** 45, 46"));
        assert!(md.contains("**Labels:** security"));
        assert!(md.contains("**Severity:** high"));
        assert!(md.contains("```\ncursor.execute('SELECT * FROM users WHERE id = %s', (user_id,))\n```"));
        assert!(md.contains("## Test Suggestions (1)"));
        assert!(md.contains("### Test 1: auth.py"));
        assert!(md.contains("Files analyzed: 2 | Analysis time: 1.50 seconds"));

        let summary = md.find("## Summary").unwrap();
        let issues = md.find("## Issues Found").unwrap();
        let tests = md.find("## Test Suggestions").unwrap();
        assert!(summary < issues && issues < tests);
    }

    #[test]
    fn issue_block_ends_with_labels() {
        let md = render(&sample(None));
        let title = md.find("### 1. Security vulnerability").unwrap();
        let file = md.find("**File:**").unwrap();
        let lines = md.find("**Line(s):**").unwrap();
        let desc = md.find("SQL injection risk").unwrap();
        let suggestion = md.find("**Suggestion:**").unwrap();
        let code = md.find("cursor.execute").unwrap();
        let labels = md.find("**Labels:** security").unwrap();
        assert!(title < file && file < lines && lines < desc);
        assert!(desc < suggestion && suggestion < code && code < labels);
        assert!(labels < md.find("## Test Suggestions").unwrap());
    }

    #[test]
    fn summary_section_only_when_non_empty() {
        assert!(!render(&sample(None)).contains("## Summary"));
        assert!(!render(&sample(Some("  "))).contains("## Summary"));
    }

    #[test]
    fn fences_outgrow_embedded_backticks() {
        let mut r = sample(None);
        r.issues[0].code_example = Some("let s = \"```\";".into());
        r.issues[0].file_path = "we`ird.rs".into();
        let md = render(&r);
        assert!(md.contains("````\nlet s = \"```\";\n````"));
        assert!(md.contains("`` we`ird.rs ``"));
    }
}
