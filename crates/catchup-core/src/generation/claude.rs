use super::{build_prompt, first_non_empty, GeneratorOptions, SummaryGenerator};
use crate::error::GenerationError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "claude";

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

/// Generator backed by the Anthropic Messages API.
pub struct ClaudeGenerator {
    client: reqwest::Client,
    api_key: HeaderValue,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeGenerator {
    pub fn new(
        api_key: impl Into<String>,
        options: GeneratorOptions,
    ) -> Result<Self, GenerationError> {
        let mut api_key =
            HeaderValue::try_from(api_key.into()).map_err(|e| GenerationError::Provider {
                provider: PROVIDER,
                message: format!("invalid API key header: {}", e),
            })?;
        api_key.set_sensitive(true);

        Ok(Self {
            client: options.http_client(PROVIDER)?,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: options.max_output_tokens,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", self.api_key.clone());
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers
    }
}

/// Map a raw Messages API response onto the generation contract.
fn interpret_response(status: StatusCode, body: &str) -> Result<String, GenerationError> {
    if !status.is_success() {
        warn!("Claude API returned status {}: {}", status.as_u16(), body);
        return Err(GenerationError::Status {
            provider: PROVIDER,
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|source| GenerationError::Decode {
            provider: PROVIDER,
            source,
        })?;

    if let Some(err) = parsed.error {
        warn!("Claude API error: type={}, message={}", err.kind, err.message);
        return Err(GenerationError::Provider {
            provider: PROVIDER,
            message: err.message,
        });
    }

    first_non_empty(
        parsed
            .content
            .iter()
            .filter(|block| block.kind.is_empty() || block.kind == "text")
            .map(|block| block.text.as_str()),
    )
    .ok_or(GenerationError::EmptyResult { provider: PROVIDER })
}

#[async_trait]
impl SummaryGenerator for ClaudeGenerator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, industry: &str, time_period: &str) -> Result<String, GenerationError> {
        debug!(
            "Claude: generating summary (industry={}, period={}, model={})",
            industry, time_period, self.model
        );
        let prompt = build_prompt(industry, time_period);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers())
            .json(&self.build_body(&prompt))
            .send()
            .await
            .map_err(|source| GenerationError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GenerationError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let summary = interpret_response(status, &body)?;
        debug!("Claude: generated summary ({} characters)", summary.len());
        Ok(summary)
    }
}
