use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_FONT_PATH: &str = "assets/fonts/GeistMono-Regular.ttf";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings for the chat-completion endpoint.
#[derive(Clone, Debug)]
pub struct LlmSettings {
    pub api_url: Url,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl LlmSettings {
    /// Settings pointing at `api_url`, everything else defaulted.
    pub fn new(api_url: Url, api_key: Option<String>) -> Self {
        LlmSettings {
            api_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// A blank key counts as missing.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_ref().is_some_and(|key| !key.trim().is_empty())
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub font_path: PathBuf,
    pub bind_addr: String,
}

impl AppConfig {
    /// Reads the configuration from the environment, loading `.env` first when present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::info!("[CONFIG] Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url_raw = get("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url_raw)
            .with_context(|| format!("OPENAI_API_URL is not a valid URL: {api_url_raw}"))?;

        let mut llm = LlmSettings::new(api_url, get("OPENAI_API_KEY"));

        if let Some(model) = get("OPENAI_MODEL") {
            llm.model = model;
        }
        if let Some(raw) = get("OPENAI_TEMPERATURE") {
            let temperature: f32 = raw
                .parse()
                .map_err(|_| anyhow!("OPENAI_TEMPERATURE must be a number, got {raw}"))?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow!("OPENAI_TEMPERATURE must be between 0 and 2, got {raw}"));
            }
            llm.temperature = temperature;
        }
        if let Some(raw) = get("OPENAI_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| anyhow!("OPENAI_TIMEOUT_SECS must be a whole number, got {raw}"))?;
            llm.timeout = Duration::from_secs(secs);
        }

        if llm.is_configured() {
            tracing::info!("[CONFIG] LLM endpoint {} using model {}", llm.api_url, llm.model);
        } else {
            tracing::warn!("[CONFIG] OPENAI_API_KEY not set, every analysis will use the fallback");
        }

        Ok(AppConfig {
            llm,
            font_path: get("CHART_FONT_PATH")
                .unwrap_or_else(|| DEFAULT_FONT_PATH.to_string())
                .into(),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
