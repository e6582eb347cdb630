use crate::cache::SummaryCache;
use crate::catalog::{cache_key, Industry, TimePeriod};
use crate::error::Result;
use crate::generation::SummaryGenerator;
use crate::types::{CatchUpRequest, CatchUpResponse};
use log::{info, warn};
use std::sync::Arc;

/// Answers catch-up queries from the cache, falling back to a generator.
///
/// Concurrent misses on the same key are not coalesced: each one calls the
/// generator and the last write wins.
#[derive(Clone)]
pub struct CatchUpService {
    cache: Arc<dyn SummaryCache>,
    generator: Arc<dyn SummaryGenerator>,
}

impl CatchUpService {
    pub fn new(cache: Arc<dyn SummaryCache>, generator: Arc<dyn SummaryGenerator>) -> Self {
        Self { cache, generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn handle_request(&self, request: &CatchUpRequest) -> Result<CatchUpResponse> {
        self.handle(&request.industry, &request.time_period).await
    }

    /// Validate, look up, and on a miss generate and write through.
    ///
    /// A failed cache write is logged and dropped; it never changes the
    /// response.
    pub async fn handle(&self, industry: &str, time_period: &str) -> Result<CatchUpResponse> {
        let industry: Industry = industry.parse()?;
        let period: TimePeriod = time_period.parse()?;
        let key = cache_key(industry, period);

        if let Some(summary) = self.cache.get(&key).filter(|s| !s.is_empty()) {
            info!("Cache hit for key: {}", key);
            return Ok(respond(summary, industry, period, true));
        }

        let summary = self
            .generator
            .generate(industry.label(), period.label())
            .await
            .inspect_err(|e| {
                warn!(
                    "Failed to generate summary for {} via {}: {}",
                    key,
                    self.generator.name(),
                    e
                )
            })?;

        if let Err(e) = self.cache.set(&key, &summary) {
            warn!("Failed to cache response for key {}: {}", key, e);
        }

        info!("Generated summary for {} via {}", key, self.generator.name());
        Ok(respond(summary, industry, period, false))
    }
}

fn respond(summary: String, industry: Industry, period: TimePeriod, cached: bool) -> CatchUpResponse {
    CatchUpResponse {
        summary,
        industry: industry.label().to_string(),
        period: period.label().to_string(),
        cached,
    }
}
