use thiserror::Error;

/// Errors that can occur while fetching a recipe from the meal API
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    /// The API returned no meals (or the query was empty)
    #[error("No recipe found")]
    NoResults,

    /// The payload or the chosen meal could not be decoded into a recipe
    #[error("Failed to decode meal: {0}")]
    Decode(String),

    /// The fetch task ended without producing a result
    #[error("Fetch was interrupted")]
    Interrupted,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Which way a fetch failed, without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Status,
    NoResults,
    Decode,
    Interrupted,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Transport(_) => FailureKind::Transport,
            FetchError::Status(_) => FailureKind::Status,
            FetchError::NoResults => FailureKind::NoResults,
            FetchError::Decode(_) => FailureKind::Decode,
            FetchError::Interrupted => FailureKind::Interrupted,
        }
    }
}

/// Errors surfaced by the command-line front end
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The HTTP client could not be created
    #[error("Client error: {0}")]
    Client(#[from] FetchError),

    /// The recipe could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading from the terminal failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(FetchError::NoResults.kind(), FailureKind::NoResults);
        assert_eq!(
            FetchError::Status(reqwest::StatusCode::NOT_FOUND).kind(),
            FailureKind::Status
        );
        assert_eq!(
            FetchError::Decode("bad".to_string()).kind(),
            FailureKind::Decode
        );
    }

    #[test]
    fn test_serde_error_becomes_decode() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch_err: FetchError = err.into();
        assert_eq!(fetch_err.kind(), FailureKind::Decode);
        assert!(fetch_err.to_string().starts_with("Failed to decode meal"));
    }
}
