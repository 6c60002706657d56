mod analyze;

pub use analyze::{AnalyzeClient, AnalyzeEnvelope};
