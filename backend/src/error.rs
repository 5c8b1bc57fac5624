use thiserror::Error;

use crate::acquisition::LegFailure;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing required input: {0}")]
    MissingInput(&'static str),
    #[error("no directions leg returned a route ({})", describe_failures(.failures))]
    AcquisitionFailed { failures: Vec<LegFailure> },
}

fn describe_failures(failures: &[LegFailure]) -> String {
    if failures.is_empty() {
        return "no leg attempted".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
