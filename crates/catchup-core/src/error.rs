use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatchUpError>;

#[derive(Debug, Error)]
pub enum CatchUpError {
    #[error("Invalid industry: {0}")]
    InvalidIndustry(String),

    #[error("Invalid time period: {0}")]
    InvalidTimePeriod(String),

    #[error("Failed to generate summary: {0}")]
    Generation(#[from] GenerationError),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl CatchUpError {
    /// True for errors caused by caller input rather than by a backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatchUpError::InvalidIndustry(_) | CatchUpError::InvalidTimePeriod(_)
        )
    }
}

/// Failure of a single call to a summary generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network failure or timeout before a response arrived.
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status.
    #[error("{provider} API error (status {status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Provider answered 200 but embedded an error object.
    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("empty response from {provider}")]
    EmptyResult { provider: &'static str },
}

impl GenerationError {
    pub fn is_transport(&self) -> bool {
        matches!(self, GenerationError::Transport { .. })
    }

    pub fn provider(&self) -> &'static str {
        match self {
            GenerationError::Transport { provider, .. }
            | GenerationError::Status { provider, .. }
            | GenerationError::Provider { provider, .. }
            | GenerationError::Decode { provider, .. }
            | GenerationError::EmptyResult { provider } => provider,
        }
    }
}
