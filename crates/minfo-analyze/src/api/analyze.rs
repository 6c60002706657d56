use std::time::Duration;

use minfo_core::{MinfoError, MinfoResult, ResultsMap};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;

/// Top-level response envelope from the analysis endpoint: `results` on
/// success, `error` on failure. The server may deliver the error form with
/// any status code.
#[derive(Debug, Deserialize)]
pub struct AnalyzeEnvelope {
    pub results: Option<ResultsMap>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AnalyzeClient {
    client: Client,
    endpoint: String,
}

impl AnalyzeClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("minfo/0.1")
            .timeout(timeout)
            .build()
            .expect("failed to build http client");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// One round trip: ask for both representations of the report, then run
    /// the response through [`interpret_response`].
    pub async fn fetch_report(&self, url: &str) -> MinfoResult<Option<ResultsMap>> {
        tracing::debug!(%url, endpoint = %self.endpoint, "requesting analysis");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url), ("format", "json,text")])
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| MinfoError::Network(format!("analyze request failed: {err}")))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|err| MinfoError::Network(format!("failed to read response body: {err}")))?;

        interpret_response(status, content_type.as_deref(), &body)
    }
}

/// The response decision table. JSON-labeled bodies are decoded as the
/// envelope and then protocol-checked: a non-success status or an `error`
/// field fails with the server's message when it sent one. Anything else
/// fails with the numeric status (non-success) or as an unrecognized
/// response (success).
pub(crate) fn interpret_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> MinfoResult<Option<ResultsMap>> {
    let declares_json = content_type.is_some_and(|value| value.contains("application/json"));

    if !declares_json {
        if !status.is_success() {
            return Err(MinfoError::ServerStatus(status.as_u16()));
        }
        tracing::warn!(
            status = status.as_u16(),
            body = %String::from_utf8_lossy(body),
            "unexpected non-JSON response"
        );
        return Err(MinfoError::InvalidResponse);
    }

    let envelope: AnalyzeEnvelope = serde_json::from_slice(body).map_err(|err| {
        tracing::warn!(%err, "response labeled as JSON did not decode");
        MinfoError::InvalidResponse
    })?;

    if !status.is_success() || envelope.error.is_some() {
        return Err(MinfoError::Analysis(envelope.error));
    }

    Ok(envelope.results)
}
