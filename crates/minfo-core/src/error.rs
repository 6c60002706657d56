use thiserror::Error;

/// Failure categories for one analysis submission.
///
/// Display strings are the user-visible messages; the CLI prints them
/// verbatim in its error line, so they are worded for humans rather than
/// for logs.
#[derive(Debug, Error)]
pub enum MinfoError {
    /// The input URL was empty after trimming. Never reaches the network.
    #[error("Please enter a valid URL.")]
    EmptyInput,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The request itself failed: DNS, refused connection, timeout.
    #[error("{0}")]
    Network(String),
    /// Non-success HTTP status with a non-JSON body.
    #[error("Server Error ({0}): Analysis failed.")]
    ServerStatus(u16),
    /// The body was neither the expected envelope nor labeled as JSON.
    #[error("Invalid server response.")]
    InvalidResponse,
    /// The server answered with an error envelope, or a non-success status
    /// carrying a JSON body. Uses the server's message when it sent one.
    #[error("{}", .0.as_deref().unwrap_or("Unable to analyze this URL."))]
    Analysis(Option<String>),
    /// The structured media report could not be decoded. Does not fail the
    /// submission; the caller falls back to the text view.
    #[error("could not parse media report: {0}")]
    Report(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type MinfoResult<T> = Result<T, MinfoError>;
