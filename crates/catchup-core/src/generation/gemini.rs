use super::{build_prompt, first_non_empty, GeneratorOptions, SummaryGenerator};
use crate::error::GenerationError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "gemini";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Generator backed by the Gemini `generateContent` API.
///
/// The API key travels as the `key` query parameter.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl GeminiGenerator {
    pub fn new(
        api_key: impl Into<String>,
        options: GeneratorOptions,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: options.http_client(PROVIDER)?,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: options.max_output_tokens,
        })
    }

    /// Override the models base URL (the part before `/{model}:generateContent`).
    pub fn with_endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn build_body<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

fn interpret_response(status: StatusCode, body: &str) -> Result<String, GenerationError> {
    if !status.is_success() {
        warn!("Gemini API returned status {}: {}", status.as_u16(), body);
        return Err(GenerationError::Status {
            provider: PROVIDER,
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|source| GenerationError::Decode {
            provider: PROVIDER,
            source,
        })?;

    if let Some(err) = parsed.error {
        warn!(
            "Gemini API error: code={}, message={}, status={}",
            err.code, err.message, err.status
        );
        return Err(GenerationError::Provider {
            provider: PROVIDER,
            message: err.message,
        });
    }

    first_non_empty(
        parsed
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .map(|p| p.text.as_str()),
    )
    .ok_or(GenerationError::EmptyResult { provider: PROVIDER })
}

#[async_trait]
impl SummaryGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, industry: &str, time_period: &str) -> Result<String, GenerationError> {
        debug!(
            "Gemini: generating summary (industry={}, period={}, model={})",
            industry, time_period, self.model
        );
        let prompt = build_prompt(industry, time_period);

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
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
        debug!("Gemini: generated summary ({} characters)", summary.len());
        Ok(summary)
    }
}
