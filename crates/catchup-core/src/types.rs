use serde::{Deserialize, Serialize};

/// Inbound catch-up query. Missing fields decode as empty strings and are
/// rejected during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatchUpRequest {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub time_period: String,
}

impl CatchUpRequest {
    pub fn new(industry: impl Into<String>, time_period: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            time_period: time_period.into(),
        }
    }
}

/// Answer to a catch-up query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchUpResponse {
    pub summary: String,
    /// Display label of the industry
    pub industry: String,
    /// Display label of the time period
    pub period: String,
    /// Whether this was served from cache
    pub cached: bool,
}
