//! Closed sets of industries and time periods the service recognizes.
//!
//! Each value has a wire key (what callers send) and a display label (what
//! generators and responses see). Keys never contain `:`, so [`cache_key`]
//! is collision-free.

use crate::error::CatchUpError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Industry {
    SoftwareDevelopment,
    Marketing,
    Healthcare,
    Legal,
}

impl Industry {
    pub const ALL: [Industry; 4] = [
        Industry::SoftwareDevelopment,
        Industry::Marketing,
        Industry::Healthcare,
        Industry::Legal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Industry::SoftwareDevelopment => "software-development",
            Industry::Marketing => "marketing",
            Industry::Healthcare => "healthcare",
            Industry::Legal => "legal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Industry::SoftwareDevelopment => "Software Development",
            Industry::Marketing => "Marketing",
            Industry::Healthcare => "Healthcare",
            Industry::Legal => "Legal",
        }
    }

    /// Comma-separated list of accepted keys, for error details.
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(|i| i.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Industry {
    type Err = CatchUpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.key() == s)
            .ok_or_else(|| CatchUpError::InvalidIndustry(s.to_string()))
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePeriod {
    SixMonths,
    OneYear,
    TwoToThreeYears,
    FiveYears,
    TenYears,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::SixMonths,
        TimePeriod::OneYear,
        TimePeriod::TwoToThreeYears,
        TimePeriod::FiveYears,
        TimePeriod::TenYears,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TimePeriod::SixMonths => "6-months",
            TimePeriod::OneYear => "1-year",
            TimePeriod::TwoToThreeYears => "2-3-years",
            TimePeriod::FiveYears => "5-years",
            TimePeriod::TenYears => "10-years",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::SixMonths => "6 months",
            TimePeriod::OneYear => "1 year",
            TimePeriod::TwoToThreeYears => "2-3 years",
            TimePeriod::FiveYears => "5+ years",
            TimePeriod::TenYears => "10+ years",
        }
    }

    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(|p| p.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for TimePeriod {
    type Err = CatchUpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| CatchUpError::InvalidTimePeriod(s.to_string()))
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Cache key for a validated pair: `"<industry>:<period>"`.
pub fn cache_key(industry: Industry, period: TimePeriod) -> String {
    format!("{}:{}", industry.key(), period.key())
}
