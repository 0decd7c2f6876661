//! Free-text chat message → structured review request.
//!
//! Each optional field has its own independent matcher. A matcher that does
//! not fire leaves the default in place; nothing here returns an error.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    markdown,
    report::{ReviewReport, ReviewSettings, ReviewTone},
};

lazy_static! {
    static ref URL: Regex = Regex::new(
        r"https?://(?:www\.)?github\.com/[\w-]+/[\w-]+(?:\.[\w-]+)*(?:/pull/\d+)?"
    )
    .unwrap();
    static ref FILE_LIST: Regex =
        Regex::new(r"(?is)\bfile(?:s|path|paths)?:\s*\[(.*?)\]").unwrap();
    static ref FILE_SPLIT: Regex = Regex::new(r"[,\s]+").unwrap();
    static ref TONE_KEYED: Regex =
        Regex::new(r"(?i)\btone:\s*(strict|mentor|neutral)\b").unwrap();
    static ref TONE_INLINE: Regex =
        Regex::new(r"(?i)\b(strict|mentor|neutral)\s+tone\b").unwrap();
    static ref MAX_ISSUES: Regex =
        Regex::new(r"(?i)\bmax(?:\s+|-|_)?issues:?\s*(\d+)").unwrap();
    static ref NO_TESTS: Regex = Regex::new(
        r"(?i)include[\s_-]+test[\s_-]+suggestions:\s*(?:false|no)\b|\b(?:no|without|skip)\s+test\s+suggestions\b"
    )
    .unwrap();
    static ref NO_SUMMARY: Regex = Regex::new(
        r"(?i)include[\s_-]+summary:\s*(?:false|no)\b|\b(?:no|without|skip)\s+summary\b"
    )
    .unwrap();
}

/// Request recovered from a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub url: String,
    pub file_paths: Option<Vec<String>>,
    pub settings: ReviewSettings,
}

/// Returns `None` when the message holds no GitHub repository or PR URL.
pub fn extract(message: &str) -> Option<ParsedRequest> {
    let url = URL.find(message)?.as_str().to_string();
    let mut settings = ReviewSettings::default();

    let file_paths = FILE_LIST.captures(message).and_then(|c| {
        let paths: Vec<String> = FILE_SPLIT
            .split(&c[1])
            .map(|p| p.trim_matches(|ch| matches!(ch, '"' | '\'' | '`')))
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        (!paths.is_empty()).then_some(paths)
    });

    if let Some(tone) = TONE_KEYED
        .captures(message)
        .or_else(|| TONE_INLINE.captures(message))
        .and_then(|c| c[1].parse::<ReviewTone>().ok())
    {
        settings.tone = tone;
    }

    if let Some(n) = MAX_ISSUES
        .captures(message)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
    {
        settings.max_issues = n;
    }

    if NO_TESTS.is_match(message) {
        settings.include_test_suggestions = false;
    }
    if NO_SUMMARY.is_match(message) {
        settings.include_summary = false;
    }

    debug!(%url, files = ?file_paths, ?settings, "chat message parsed");
    Some(ParsedRequest {
        url,
        file_paths,
        settings,
    })
}

pub const HELP_MESSAGE: &str = r#"# Code Review Assistant

This assistant analyzes GitHub repositories or pull requests and replies with AI-powered code review suggestions.

## How to use:

1. Provide a GitHub repository or pull request URL
2. Optionally list the files to review, e.g. `files: [src/main.py, src/utils.py]`
3. Optionally configure the review: `tone: strict|mentor|neutral`, `max issues: 5`, `include test suggestions: false`, `include summary: false`

Example request:
```
Please review this GitHub repository: https://github.com/username/repo
```

For more specific reviews:
```
Review this PR with strict tone and focus on security issues: https://github.com/username/repo/pull/123
```
"#;

/// Chat reply for a finished review: rendered report plus a short tally.
pub fn compose_reply(report: &ReviewReport) -> String {
    format!(
        "# Code Review Results\n\n{}\n\n## Analysis Summary\n\
         - Total files analyzed: {}\n\
         - Issues found: {}\n\
         - Test suggestions: {}\n\
         - Analysis completed in {:.2} seconds\n",
        markdown::render(report),
        report.total_files_analyzed,
        report.issues.len(),
        report.test_suggestions.len(),
        report.analysis_time_seconds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_tone_is_recognised() {
        let p = extract("Review this PR with strict tone: https://github.com/a/b/pull/7").unwrap();
        assert_eq!(p.url, "https://github.com/a/b/pull/7");
        assert_eq!(p.settings.tone, ReviewTone::Strict);
        assert_eq!(p.file_paths, None);
        assert_eq!(
            p.settings,
            ReviewSettings {
                tone: ReviewTone::Strict,
                ..Default::default()
            }
        );
    }

    #[test]
    fn no_url_is_no_match() {
        assert_eq!(extract("hello there"), None);
        assert_eq!(extract("see https://gitlab.com/a/b"), None);
    }

    #[test]
    fn every_optional_field_can_be_set() {
        let msg = r#"Please review https://github.com/octo/hello-world.
files: ["src/app.py", 'lib/util.py' README.md]
Tone: Mentor, max issues: 3, include test suggestions: false, include summary: no"#;
        let p = extract(msg).unwrap();

        assert_eq!(p.url, "https://github.com/octo/hello-world");
        assert_eq!(
            p.file_paths.unwrap(),
            ["src/app.py", "lib/util.py", "README.md"]
        );
        assert_eq!(p.settings.tone, ReviewTone::Mentor);
        assert_eq!(p.settings.max_issues, 3);
        assert!(!p.settings.include_test_suggestions);
        assert!(!p.settings.include_summary);
        assert!(!p.settings.apply_labels);
    }

    #[test]
    fn phrase_flags_and_compact_max_issues() {
        let p = extract("https://github.com/a/b without summary, skip test suggestions, max-issues 4")
            .unwrap();
        assert!(!p.settings.include_summary);
        assert!(!p.settings.include_test_suggestions);
        assert_eq!(p.settings.max_issues, 4);
    }

    #[test]
    fn malformed_fragments_fall_back_to_defaults() {
        let p = extract("https://github.com/a/b tone: grumpy max issues: 0 files: [] ").unwrap();
        assert_eq!(p.settings, ReviewSettings::default());
        assert_eq!(p.file_paths, None);

        let p = extract("https://github.com/a/b max issues: 99999999999").unwrap();
        assert_eq!(p.settings.max_issues, 10);
    }

    #[test]
    fn reply_wraps_report_with_tally() {
        let report = ReviewReport {
            issues: vec![],
            test_suggestions: vec![],
            summary: None,
            suggested_labels: Default::default(),
            total_files_analyzed: 3,
            analysis_time_seconds: 1.234,
        };
        let reply = compose_reply(&report);
        assert!(reply.starts_with("# Code Review Results\n\n# Code Review Report"));
        assert!(reply.contains("- Total files analyzed: 3"));
        assert!(reply.contains("- Analysis completed in 1.23 seconds"));
    }
}
