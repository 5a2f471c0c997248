use thiserror::Error;

/// Domain errors for route records and filter thresholds.
///
/// Neither variant is fatal: loaders skip malformed records and the UI
/// constrains thresholds to their valid ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("threshold `{name}` is out of range: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("route #{index} is malformed: {reason}")]
    MalformedRoute { index: usize, reason: String },
}

impl RouteError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        RouteError::MalformedRoute {
            index,
            reason: reason.into(),
        }
    }
}
