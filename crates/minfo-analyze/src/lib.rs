pub mod api;
mod classify;
mod report;

use std::time::Instant;

use minfo_core::{AnalysisOutcome, MinfoError};

pub use api::{AnalyzeClient, AnalyzeEnvelope};
pub use classify::{Chapter, ClassifiedTracks, classify, classify_report};
pub use report::{MediaNode, MediaReport, Track};

/// Side-channel notification about a submission's outcome (the terminal
/// bell, for instance). Implementations must not block and have no bearing
/// on the returned outcome.
pub trait FeedbackHook {
    fn on_success(&self) {}
    fn on_error(&self) {}
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl FeedbackHook for SilentFeedback {}

/// Submission controller: one URL in, one [`AnalysisOutcome`] out.
#[derive(Debug, Clone)]
pub struct Analyzer<H = SilentFeedback> {
    client: AnalyzeClient,
    feedback: H,
}

impl Analyzer<SilentFeedback> {
    pub fn new(client: AnalyzeClient) -> Self {
        Self {
            client,
            feedback: SilentFeedback,
        }
    }
}

impl<H: FeedbackHook> Analyzer<H> {
    pub fn with_feedback(client: AnalyzeClient, feedback: H) -> Self {
        Self { client, feedback }
    }

    /// Submit one URL for analysis.
    ///
    /// Never returns an error: a trimmed-empty URL is rejected locally
    /// without touching the network, and every request failure is folded
    /// into a `Failed` outcome that keeps the attempted URL. The elapsed
    /// time covers the span from just before the request to full success.
    pub async fn submit(&self, url: &str) -> AnalysisOutcome {
        let url = url.trim();
        if url.is_empty() {
            return AnalysisOutcome::rejected(MinfoError::EmptyInput.to_string());
        }

        let started = Instant::now();
        match self.client.fetch_report(url).await {
            Ok(results) => {
                let duration = started.elapsed();
                self.feedback.on_success();
                AnalysisOutcome::done(results, url, duration)
            }
            Err(err) => {
                tracing::debug!(%url, error = %err, "analysis failed");
                self.feedback.on_error();
                AnalysisOutcome::failed(err.to_string(), url)
            }
        }
    }
}
