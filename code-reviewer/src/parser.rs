//! Completion text → [`ReviewReport`].
//!
//! The model is asked for JSON but routinely wraps it in prose or code
//! fences, drops fields or invents labels. Everything is read defensively
//! from a `serde_json::Value`; only an undecodable payload degrades the
//! whole report.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::{
    errors::DegradedReason,
    report::{Issue, IssueLabel, ReviewReport, TestSuggestion},
};

const UNNAMED_ISSUE: &str = "Unnamed Issue";

/// Parses `raw`, falling back to [`degraded_report`] on malformed input.
///
/// `analysis_time_seconds` is left at zero for the caller to stamp.
pub fn parse(raw: &str, file_count: usize) -> ReviewReport {
    match try_parse(raw, file_count) {
        Ok(report) => report,
        Err(reason) => {
            error!(reason = %reason, raw_len = raw.len(), "model response could not be parsed");
            degraded_report(&reason, file_count)
        }
    }
}

/// Strict variant of [`parse`] exposing why the payload was rejected.
pub fn try_parse(raw: &str, file_count: usize) -> Result<ReviewReport, DegradedReason> {
    let payload = json_slice(raw);
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| DegradedReason::MalformedResponse(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(DegradedReason::MalformedResponse(
            "expected a JSON object at top level".to_string(),
        ));
    };

    let issues: Vec<Issue> = objects(&root, "issues").map(issue_from).collect();
    let test_suggestions: Vec<TestSuggestion> = objects(&root, "test_suggestions")
        .map(test_suggestion_from)
        .collect();
    let summary = root
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);
    let suggested_labels = labels_from(root.get("suggested_labels"));

    debug!(
        issues = issues.len(),
        test_suggestions = test_suggestions.len(),
        "model response parsed"
    );

    Ok(ReviewReport {
        issues,
        test_suggestions,
        summary,
        suggested_labels,
        total_files_analyzed: file_count,
        analysis_time_seconds: 0.0,
    })
}

/// Report returned when the model output cannot be trusted.
///
/// Exactly one issue labelled [`IssueLabel::Error`] carrying the reason.
pub fn degraded_report(reason: &DegradedReason, file_count: usize) -> ReviewReport {
    ReviewReport {
        issues: vec![Issue {
            title: "Error in Response Parsing".to_string(),
            file_path: String::new(),
            line_numbers: Vec::new(),
            description: format!("Failed to parse LLM response: {reason}"),
            suggestion: Some(
                "Please try again with a different repository or settings.".to_string(),
            ),
            code_example: None,
            labels: BTreeSet::from([IssueLabel::Error]),
            severity: None,
        }],
        test_suggestions: Vec::new(),
        summary: Some("An error occurred during code analysis.".to_string()),
        suggested_labels: BTreeSet::new(),
        total_files_analyzed: file_count,
        analysis_time_seconds: 0.0,
    }
}

/// Text between the first `{` and the last `}`, or the whole input.
fn json_slice(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw,
    }
}

fn objects<'a>(root: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Map<String, Value>> {
    root.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|v| {
            let obj = v.as_object();
            if obj.is_none() {
                warn!(entry = %v, "ignoring non-object entry in model response");
            }
            obj
        })
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn issue_from(obj: &Map<String, Value>) -> Issue {
    let line_numbers = obj
        .get("line_numbers")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_u64)
                .filter_map(|n| u32::try_from(n).ok())
                .collect()
        })
        .unwrap_or_default();

    Issue {
        title: text(obj, "title").unwrap_or_else(|| UNNAMED_ISSUE.to_string()),
        file_path: text(obj, "file_path").unwrap_or_default(),
        line_numbers,
        description: text(obj, "description").unwrap_or_default(),
        suggestion: text(obj, "suggestion"),
        code_example: text(obj, "code_example"),
        labels: labels_from(obj.get("labels")),
        severity: text(obj, "severity"),
    }
}

fn test_suggestion_from(obj: &Map<String, Value>) -> TestSuggestion {
    TestSuggestion {
        file_path: text(obj, "file_path").unwrap_or_default(),
        test_description: text(obj, "test_description").unwrap_or_default(),
        test_case_example: text(obj, "test_case_example"),
    }
}

/// Known labels only. Unknown strings and the internal `error` label are
/// dropped with a warning; the surrounding issue is kept.
fn labels_from(value: Option<&Value>) -> BTreeSet<IssueLabel> {
    let Some(items) = value.and_then(Value::as_array) else {
        return BTreeSet::new();
    };

    items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| match s.parse::<IssueLabel>() {
            Ok(IssueLabel::Error) => {
                warn!("dropping reserved label `error` from model response");
                None
            }
            Ok(label) => Some(label),
            Err(e) => {
                warn!(error = %e, "dropping label");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"Sure! Here is the review:
```json
{
  "issues": [
    {
      "title": "Security vulnerability",
      "file_path": "database.py",
      "line_numbers": [45, 46],
      "description": "SQL built by string concatenation.",
      "suggestion": "Use parameters.",
      "code_example": "cursor.execute('SELECT 1 WHERE id = %s', (uid,))",
      "severity": "high",
      "labels": ["security", "bug"]
    }
  ],
  "test_suggestions": [
    {"file_path": "database.py", "test_description": "Inject a quote.", "test_case_example": "def test_q(): ..."}
  ],
  "summary": "One risky query.",
  "suggested_labels": ["security"]
}
```
Let me know if you need anything else."#;

    #[test]
    fn well_formed_payload_is_reproduced_verbatim() {
        let r = parse(WELL_FORMED, 4);
        assert_eq!(r.issues.len(), 1);
        let i = &r.issues[0];
        assert_eq!(i.title, "Security vulnerability");
        assert_eq!(i.file_path, "database.py");
        assert_eq!(i.line_numbers, [45, 46]);
        assert_eq!(i.description, "SQL built by string concatenation.");
        assert_eq!(i.suggestion.as_deref(), Some("Use parameters."));
        assert_eq!(
            i.code_example.as_deref(),
            Some("cursor.execute('SELECT 1 WHERE id = %s', (uid,))")
        );
        assert_eq!(i.severity.as_deref(), Some("high"));
        assert_eq!(
            i.labels,
            BTreeSet::from([IssueLabel::Security, IssueLabel::Bug])
        );
        assert_eq!(r.test_suggestions[0].test_description, "Inject a quote.");
        assert_eq!(r.summary.as_deref(), Some("One risky query."));
        assert_eq!(r.suggested_labels, BTreeSet::from([IssueLabel::Security]));
        assert_eq!(r.total_files_analyzed, 4);
        assert_eq!(r.analysis_time_seconds, 0.0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let r = parse(r#"{"issues":[{}],"test_suggestions":[{}]}"#, 1);
        let i = &r.issues[0];
        assert_eq!(i.title, "Unnamed Issue");
        assert_eq!(i.file_path, "");
        assert!(i.line_numbers.is_empty());
        assert_eq!(i.description, "");
        assert_eq!(i.suggestion, None);
        assert!(i.labels.is_empty());
        assert_eq!(r.test_suggestions[0].file_path, "");
        assert_eq!(r.test_suggestions[0].test_case_example, None);
        assert_eq!(r.summary, None);
        assert!(r.suggested_labels.is_empty());
    }

    #[test]
    fn unknown_labels_are_dropped_but_issue_kept() {
        let r = parse(
            r#"{"issues":[{"title":"t","labels":["mock","style","error"]}],"suggested_labels":["nope"]}"#,
            1,
        );
        assert_eq!(r.issues.len(), 1);
        assert_eq!(r.issues[0].labels, BTreeSet::from([IssueLabel::Style]));
        assert!(r.suggested_labels.is_empty());
    }

    #[test]
    fn garbage_yields_single_error_issue() {
        for raw in ["I cannot review this code.", "{ not json }", "[1, 2, 3]", ""] {
            let r = parse(raw, 7);
            assert_eq!(r.issues.len(), 1, "{raw:?}");
            assert_eq!(r.issues[0].labels, BTreeSet::from([IssueLabel::Error]));
            assert!(r.issues[0].description.starts_with("Failed to parse LLM response: "));
            assert!(r.test_suggestions.is_empty());
            assert!(r.suggested_labels.is_empty());
            assert_eq!(r.total_files_analyzed, 7);
        }
    }

    #[test]
    fn try_parse_reports_reason() {
        assert!(matches!(
            try_parse("nothing here", 0),
            Err(DegradedReason::MalformedResponse(_))
        ));
    }
}
