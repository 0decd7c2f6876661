//! End-to-end review run: URL → files → prompt → completion → report.
//!
//! Steps run strictly in order within one request. The only work that
//! outlives [`ReviewPipeline::run`] is label application, which is spawned
//! onto the runtime and never awaited.

use std::{collections::BTreeSet, time::Instant};

use tracing::{debug, error, info, warn};

use crate::{
    errors::{DegradedReason, Error, ReviewResult},
    fetch, mock, parser, prompt,
    provider::{CompletionProvider, CompletionRequest, RepoHandle, RepositoryContentProvider},
    report::{IssueLabel, ReviewReport, ReviewSettings},
    select, target,
};

/// How completions are produced; chosen once at startup.
#[derive(Debug, Clone)]
pub enum CompletionMode<C> {
    /// Call the configured completion provider.
    Live(C),
    /// Generate a deterministic synthetic report from the selected paths.
    Mock,
}

/// GitHub label color for each issue label.
pub fn label_color(label: IssueLabel) -> &'static str {
    match label {
        IssueLabel::Security => "d93f0b",
        IssueLabel::Style => "c5def5",
        IssueLabel::Refactor => "cc68dd",
        IssueLabel::TestCoverage => "fbca04",
        IssueLabel::Performance => "ffb8c6",
        IssueLabel::Documentation => "0e8a16",
        IssueLabel::Bug => "d93f0b",
        IssueLabel::Error => "ff0000",
    }
}

pub fn label_description(label: IssueLabel) -> String {
    format!("AI-detected {label} issue")
}

#[derive(Debug, Clone)]
pub struct ReviewPipeline<R, C> {
    repository: R,
    completion: CompletionMode<C>,
}

impl<R, C> ReviewPipeline<R, C>
where
    R: RepositoryContentProvider + Clone + 'static,
    C: CompletionProvider,
{
    pub fn new(repository: R, completion: CompletionMode<C>) -> Self {
        Self {
            repository,
            completion,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.completion, CompletionMode::Mock)
    }

    /// Runs one review.
    ///
    /// # Errors
    /// - [`Error::Validation`] when `settings.max_issues` is zero
    /// - [`Error::InvalidUrl`] when `url` is not a GitHub repository or PR URL
    /// - [`Error::Repository`] when the repository or its file listing is unavailable
    ///
    /// Completion and parsing failures never surface here; they yield a
    /// clearly labelled fallback report instead.
    pub async fn run(
        &self,
        url: &str,
        file_hints: Option<&[String]>,
        settings: &ReviewSettings,
    ) -> ReviewResult<ReviewReport> {
        let started = Instant::now();

        if settings.max_issues == 0 {
            return Err(Error::Validation(
                "max_issues must be greater than zero".to_string(),
            ));
        }

        debug!("step1: resolve target");
        let target = target::resolve(url)?;
        let repo = self
            .repository
            .resolve_repository(&target.owner, &target.repo_name)
            .await?;
        info!(
            owner = %target.owner,
            repo = %target.repo_name,
            pr = ?target.pr_number,
            "review target resolved"
        );

        let git_ref = match target.pr_number {
            Some(pr) => match self.repository.pull_request_head(&repo, pr).await {
                Ok(sha) => sha,
                Err(e) => {
                    warn!(pr, error = %e, "could not read PR head, fetching default branch");
                    None
                }
            },
            None => None,
        };

        debug!("step2: select and fetch files");
        let selected = select::select_files(&self.repository, &repo, &target, file_hints).await?;
        let files = fetch::fetch_snapshots(&self.repository, &repo, &selected, git_ref.as_deref()).await;
        let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        debug!(files = files.len(), "step2: files ready");

        debug!("step3: build prompt");
        let prompt = prompt::build(&files, settings);
        debug!(prompt_len = prompt.len(), "step3: prompt built");

        debug!("step4: completion");
        // Only a live reply that parses cleanly may label a real PR.
        let mut trusted = !self.is_mock();
        let raw = match self.generate(&prompt, &paths).await {
            Ok(text) => text,
            Err(reason) => {
                error!(reason = %reason, "completion failed, using fallback report");
                trusted = false;
                mock::fallback_completion(&paths, &reason)
            }
        };

        debug!("step5: parse response");
        let mut report = match parser::try_parse(&raw, files.len()) {
            Ok(report) => report,
            Err(reason) => {
                error!(reason = %reason, raw_len = raw.len(), "model response could not be parsed");
                trusted = false;
                parser::degraded_report(&reason, files.len())
            }
        };
        report.total_files_analyzed = files.len();
        report.analysis_time_seconds = started.elapsed().as_secs_f64();

        info!(
            files = report.total_files_analyzed,
            issues = report.issues.len(),
            test_suggestions = report.test_suggestions.len(),
            mock = self.is_mock(),
            elapsed_s = report.analysis_time_seconds,
            "review finished"
        );

        if settings.apply_labels {
            if let Some(pr) = target.pr_number {
                if trusted {
                    self.spawn_label_application(repo, pr, report.issue_labels());
                } else {
                    info!(pr, mock = self.is_mock(), "synthetic report, skipping label application");
                }
            }
        }

        Ok(report)
    }

    async fn generate(&self, prompt: &str, paths: &[String]) -> Result<String, DegradedReason> {
        match &self.completion {
            CompletionMode::Mock => Ok(mock::mock_completion(paths)),
            CompletionMode::Live(provider) => provider
                .complete(CompletionRequest {
                    system: prompt::SYSTEM_PROMPT,
                    prompt,
                    max_tokens: prompt::MAX_TOKENS,
                    temperature: prompt::TEMPERATURE,
                })
                .await
                .map_err(DegradedReason::Completion),
        }
    }

    fn spawn_label_application(&self, repo: RepoHandle, pr: u64, labels: BTreeSet<IssueLabel>) {
        if labels.is_empty() {
            debug!(pr, "no labels to apply");
            return;
        }
        let provider = self.repository.clone();
        tokio::spawn(async move {
            apply_labels(&provider, &repo, pr, &labels).await;
        });
    }
}

/// Ensures each label exists on the repository and attaches it to the PR.
///
/// Failures are logged per label and otherwise ignored.
pub async fn apply_labels<R: RepositoryContentProvider>(
    provider: &R,
    repo: &RepoHandle,
    pr: u64,
    labels: &BTreeSet<IssueLabel>,
) {
    for label in labels {
        let name = label.as_str();
        if let Err(e) = provider
            .ensure_label(repo, name, label_color(*label), &label_description(*label))
            .await
        {
            warn!(label = name, error = %e, "could not create label");
        }
        match provider.attach_label(repo, pr, name).await {
            Ok(()) => info!(label = name, pr, "label added to pull request"),
            Err(e) => warn!(label = name, pr, error = %e, "could not attach label"),
        }
    }
}
