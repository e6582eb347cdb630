pub mod cache;
pub mod catalog;
pub mod error;
pub mod generation;
pub mod service;
pub mod types;

pub use cache::{
    CacheConfig, CacheStats, Clock, ManualClock, SummaryCache, SystemClock, TtlCache,
};
pub use catalog::{cache_key, Industry, TimePeriod};
pub use error::{CatchUpError, GenerationError, Result};
pub use generation::{
    build_prompt, ClaudeGenerator, GeminiGenerator, GeneratorOptions, SummaryGenerator,
};
pub use service::CatchUpService;
pub use types::{CatchUpRequest, CatchUpResponse};
