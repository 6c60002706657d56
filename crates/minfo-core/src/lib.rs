mod error;
mod outcome;
mod view;

pub use error::{MinfoError, MinfoResult};
pub use outcome::{AnalysisOutcome, ResultsMap, SubmissionStatus};
pub use view::ViewMode;
