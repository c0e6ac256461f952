//! Error types for the Shorttags SDK.

/// Errors that can occur when sending metrics.
///
/// Disabled tracking is not an error; see [`TrackResult::Skipped`](crate::TrackResult::Skipped).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The client is missing its API key or site ID, or could not be set up.
    #[error("{0}")]
    Configuration(String),

    /// The request failed, timed out, or the API answered with a non-2xx status.
    #[error("{0}")]
    Api(String),
}

impl Error {
    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Returns true for API errors.
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    /// The human-readable message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            Error::Configuration(msg) | Error::Api(msg) => msg,
        }
    }
}
