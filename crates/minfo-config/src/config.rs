use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Base URL of the analysis endpoint, e.g.
    /// `https://media.example.net/resource/analyze`.
    pub endpoint: Option<String>,
    /// Whole-request timeout. Unset means the built-in 30 s default.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default view for finished analyses: "text" or "structured".
    pub view: Option<String>,
    /// Ring the terminal bell when an analysis fails.
    pub bell: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MinfoConfig {
    pub api: ApiConfig,
    pub output: OutputConfig,
}
