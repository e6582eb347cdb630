use catchup_core::{CacheConfig, GeneratorOptions};
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Which summary generator backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Claude,
    Gemini,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "catchup")]
#[command(version, about = "Catch up on what changed in your industry while you were away")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "CATCHUP_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// HTTP port
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Summary generator backend
    #[arg(long, env = "CATCHUP_PROVIDER", value_enum, default_value = "claude")]
    pub provider: Provider,

    /// Anthropic API key (required with --provider claude)
    #[arg(long, env = "CLAUDE_API_KEY", hide_env_values = true)]
    pub claude_api_key: Option<String>,

    /// Gemini API key (required with --provider gemini)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Model override for the selected provider
    #[arg(long, env = "CATCHUP_MODEL")]
    pub model: Option<String>,

    /// Maximum output tokens requested from the provider
    #[arg(long, env = "CATCHUP_MAX_OUTPUT_TOKENS", default_value = "2048")]
    pub max_output_tokens: u32,

    /// Timeout for each generation request, in seconds
    #[arg(long, env = "CATCHUP_REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    /// How long a generated summary is served from cache, in hours
    #[arg(long, env = "CATCHUP_CACHE_TTL_HOURS", default_value = "168")]
    pub cache_ttl_hours: u64,

    /// How often expired cache entries are purged, in seconds
    #[arg(long, env = "CATCHUP_SWEEP_INTERVAL_SECS", default_value = "3600")]
    pub sweep_interval_secs: u64,

    /// Directory of static frontend files (served when it exists)
    #[arg(long, env = "CATCHUP_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_ttl(Duration::from_secs(self.cache_ttl_hours * 60 * 60))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions::new()
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_max_output_tokens(self.max_output_tokens)
    }

    /// API key for the selected provider, if one was supplied.
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            Provider::Claude => self.claude_api_key.as_deref(),
            Provider::Gemini => self.gemini_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key().is_none() {
            let var = match self.provider {
                Provider::Claude => "CLAUDE_API_KEY",
                Provider::Gemini => "GEMINI_API_KEY",
            };
            anyhow::bail!("{} environment variable is required", var);
        }
        if self.cache_ttl_hours == 0 {
            anyhow::bail!("cache TTL must be at least one hour");
        }
        // Keep the TTL representable as a duration
        if self.cache_ttl_hours > 24 * 365 * 100 {
            anyhow::bail!("cache TTL must be at most 100 years");
        }
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("sweep interval must be greater than zero");
        }
        if self.sweep_interval_secs > self.cache_ttl_hours * 60 * 60 {
            anyhow::bail!("sweep interval must not exceed the cache TTL");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request timeout must be greater than zero");
        }
        Ok(())
    }
}
