use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Server-produced representations of one analysis, keyed by format name
/// (`"json"`, `"text"`, whatever else the server chooses to emit).
pub type ResultsMap = BTreeMap<String, String>;

/// Where a submission ended up. Rendered as `""`, `"Done"` or `"Failed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Nothing was sent: the input was rejected locally.
    #[default]
    #[serde(rename = "")]
    Idle,
    Done,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "",
            SubmissionStatus::Done => "Done",
            SubmissionStatus::Failed => "Failed",
        }
    }
}

/// Result record of a single submission. A new submission replaces the
/// previous record wholesale; nothing is mutated in place. `results` and
/// `error` are never both set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub results: Option<ResultsMap>,
    pub error: Option<String>,
    pub status: SubmissionStatus,
    pub url: Option<String>,
    pub duration: Option<Duration>,
}

impl AnalysisOutcome {
    /// Local rejection: no request was made, status stays idle.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Successful analysis. The server may omit `results` entirely.
    pub fn done(results: Option<ResultsMap>, url: impl Into<String>, duration: Duration) -> Self {
        Self {
            results,
            error: None,
            status: SubmissionStatus::Done,
            url: Some(url.into()),
            duration: Some(duration),
        }
    }

    /// Failed analysis. The URL is kept so the caller can retain the
    /// attempted value.
    pub fn failed(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            results: None,
            error: Some(message.into()),
            status: SubmissionStatus::Failed,
            url: Some(url.into()),
            duration: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == SubmissionStatus::Done
    }

    /// The raw report in the given format, if the server returned one.
    pub fn output(&self, format: &str) -> Option<&str> {
        self.results
            .as_ref()
            .and_then(|map| map.get(format))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AnalysisOutcome, ResultsMap, SubmissionStatus};

    #[test]
    fn rejected_outcome_is_idle_with_no_results() {
        let outcome = AnalysisOutcome::rejected("Please enter a valid URL.");
        assert_eq!(outcome.status, SubmissionStatus::Idle);
        assert_eq!(outcome.status.as_str(), "");
        assert!(outcome.results.is_none());
        assert_eq!(outcome.error.as_deref(), Some("Please enter a valid URL."));
        assert!(outcome.url.is_none());
    }

    #[test]
    fn done_and_failed_never_carry_both_results_and_error() {
        let mut results = ResultsMap::new();
        results.insert("text".to_string(), "report".to_string());

        let done = AnalysisOutcome::done(Some(results), "https://a.example/v.mkv", Duration::from_millis(42));
        assert!(done.is_done());
        assert!(done.error.is_none());
        assert_eq!(done.output("text"), Some("report"));

        let failed = AnalysisOutcome::failed("boom", "https://a.example/v.mkv");
        assert_eq!(failed.status.as_str(), "Failed");
        assert!(failed.results.is_none());
        assert_eq!(failed.url.as_deref(), Some("https://a.example/v.mkv"));
    }
}
