use thiserror::Error;

/// Failures of the simulation core. Null or full overlap, and agents without
/// neighbors, are ordinary outcomes of the interaction rule and never errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("the grid holds no agents, run setup first")]
    EmptyGrid,
    #[error("could not write observations: {0}")]
    Output(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Output(e.to_string())
    }
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
