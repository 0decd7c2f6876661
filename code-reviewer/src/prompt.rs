//! Renders files and settings into the review prompt.
//!
//! Output is a pure function of its inputs: files keep their given order and
//! the JSON file map is serialized without any hash-ordered containers.

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::report::{FileSnapshot, IssueLabel, ReviewSettings, ReviewTone};

pub const SYSTEM_PROMPT: &str =
    "You are a code review assistant that provides detailed and helpful feedback.";

pub const MAX_TOKENS: u32 = 2000;

pub const TEMPERATURE: f32 = 0.1;

const RESPONSE_SCHEMA: &str = r#"{
  "issues": [
    {
      "title": "Issue title",
      "file_path": "path/to/file.ext",
      "line_numbers": [23, 24],
      "description": "Detailed explanation of the issue",
      "suggestion": "How to fix it",
      "code_example": "Example code fix",
      "severity": "high | medium | low",
      "labels": ["security", "refactor"]
    }
  ],
  "test_suggestions": [
    {
      "file_path": "path/to/file.ext",
      "test_description": "What should be tested",
      "test_case_example": "Example test code"
    }
  ],
  "summary": "High-level summary for non-technical stakeholders",
  "suggested_labels": ["security", "refactor"]
}"#;

pub fn tone_instruction(tone: ReviewTone) -> &'static str {
    match tone {
        ReviewTone::Strict => {
            "Be thorough and critical in your review. Focus on identifying all issues and potential improvements."
        }
        ReviewTone::Mentor => {
            "Be constructive and educational. Explain issues clearly and provide guidance on how to improve the code."
        }
        ReviewTone::Neutral => {
            "Provide a balanced review focusing on significant issues while acknowledging good practices."
        }
    }
}

/// Path-keyed map in input order.
struct FileMap<'a>(&'a [FileSnapshot]);

struct FileEntry<'a>(&'a FileSnapshot);

impl Serialize for FileMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for f in self.0 {
            map.serialize_entry(&f.path, &FileEntry(f))?;
        }
        map.end()
    }
}

impl Serialize for FileEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let diff = self.0.diff.as_deref().filter(|d| !d.is_empty());
        let len = if diff.is_some() { 3 } else { 2 };
        let mut s = serializer.serialize_struct("FileEntry", len)?;
        s.serialize_field("content", &self.0.content)?;
        if let Some(d) = diff {
            s.serialize_field("diff", d)?;
        }
        s.serialize_field("is_new", &self.0.is_new)?;
        s.end()
    }
}

/// Offered to the model; `error` is internal only.
fn offered_labels() -> String {
    IssueLabel::ALL
        .iter()
        .filter(|l| **l != IssueLabel::Error)
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the user prompt.
///
/// Test-suggestion and summary instructions are left out entirely when the
/// corresponding setting is off; the response schema is always included.
pub fn build(files: &[FileSnapshot], settings: &ReviewSettings) -> String {
    // Serializing strings and bools into JSON cannot fail.
    let file_map = serde_json::to_string_pretty(&FileMap(files)).unwrap_or_default();

    let mut steps = vec![
        format!(
            "Identify up to {} issues or areas for improvement in the code.",
            settings.max_issues
        ),
        format!(
            "For each issue, provide:\n\
             \x20  - A clear title describing the issue\n\
             \x20  - The file path and line numbers where the issue occurs\n\
             \x20  - A detailed description of why it's problematic\n\
             \x20  - A specific suggestion for how to fix it\n\
             \x20  - An example of improved code when applicable\n\
             \x20  - A severity (high, medium or low)\n\
             \x20  - Appropriate labels from: {}",
            offered_labels()
        ),
    ];
    if settings.include_test_suggestions {
        steps.push("Suggest test cases for components that lack testing.".to_string());
    }
    if settings.include_summary {
        steps.push(
            "Provide a high-level summary of the changes that would be understandable by non-technical stakeholders."
                .to_string(),
        );
    }

    let instructions = steps
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert code reviewer with deep knowledge of software engineering best practices, security, and performance optimization.\n\
         \n\
         REVIEW TONE: {tone}\n\
         \n\
         TASK: Perform a detailed code review of the following files and return a structured analysis.\n\
         \n\
         FILES TO REVIEW:\n\
         ```\n\
         {file_map}\n\
         ```\n\
         \n\
         INSTRUCTIONS:\n\
         \n\
         {instructions}\n\
         \n\
         FORMAT YOUR RESPONSE AS A JSON OBJECT with the following structure:\n\
         {RESPONSE_SCHEMA}\n",
        tone = tone_instruction(settings.tone),
    )
}
