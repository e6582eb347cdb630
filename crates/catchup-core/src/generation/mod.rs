//! Pluggable summary generators.
//!
//! Every provider implements [`SummaryGenerator`]; the catch-up service only
//! ever sees the trait. Providers differ in endpoint and JSON envelope, not in
//! contract: one POST per call, a bounded timeout, no retries, and the first
//! non-empty text segment of the response as the result.

pub mod claude;
pub mod gemini;

pub use claude::ClaudeGenerator;
pub use gemini::GeminiGenerator;

use crate::error::GenerationError;
use async_trait::async_trait;
use std::time::Duration;

/// One-shot text generation from an industry label and a time-period label.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Provider name (used in logs and error messages).
    fn name(&self) -> &str;

    /// Generate a catch-up summary. Labels are display forms such as
    /// `"Legal"` and `"1 year"`.
    ///
    /// Dropping the returned future abandons the outbound request.
    async fn generate(
        &self,
        industry: &str,
        time_period: &str,
    ) -> std::result::Result<String, GenerationError>;
}

#[async_trait]
impl<G: SummaryGenerator + ?Sized> SummaryGenerator for std::sync::Arc<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(
        &self,
        industry: &str,
        time_period: &str,
    ) -> std::result::Result<String, GenerationError> {
        (**self).generate(industry, time_period).await
    }
}

/// Settings shared by all HTTP-backed generators
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Whole-request timeout. Default: 60 seconds.
    pub timeout: Duration,

    /// Upper bound on generated output, in provider tokens. Default: 2048.
    pub max_output_tokens: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_output_tokens: 2048,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub(crate) fn http_client(
        &self,
        provider: &'static str,
    ) -> std::result::Result<reqwest::Client, GenerationError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| GenerationError::Transport { provider, source })
    }
}

/// Build the prompt sent to every provider.
pub fn build_prompt(industry: &str, time_period: &str) -> String {
    format!(
        "You help professionals get back up to speed after time away from work.\n\
         \n\
         Someone working in {industry} has been away for {time_period}. \
         Summarize what they missed in their field during that time.\n\
         \n\
         Organize the answer into these sections:\n\
         1. **Headlines** - major news, deals, and company events\n\
         2. **Tools & Technology** - platforms and technologies that gained real adoption\n\
         3. **Trends** - how practices and priorities have shifted\n\
         4. **Rules & Regulation** - new laws or compliance requirements, where relevant\n\
         5. **People** - notable leadership changes and influential new voices\n\
         \n\
         Keep it friendly and skimmable. Use bullet points where they help, \
         and focus on the changes that matter most to someone returning to this work."
    )
}

/// First segment with non-whitespace text, owned.
pub(crate) fn first_non_empty<'a, I>(segments: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    segments
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
