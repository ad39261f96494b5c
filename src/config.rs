use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_USDA_API_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct UsdaConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub usda: UsdaConfig,
    pub embedding: EmbeddingConfig,
    pub top_k: usize,
    pub foods_file: Option<PathBuf>,
    pub qdrant_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let anthropic_key = get("ANTHROPIC_API_KEY").ok_or(ConfigError::MissingVar("ANTHROPIC_API_KEY"))?;
        let usda_key = get("API_KEY").ok_or(ConfigError::MissingVar("API_KEY"))?;

        let provider = ProviderConfig {
            api_key: anthropic_key,
            model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            api_url: get("ANTHROPIC_API_URL").unwrap_or_else(|| DEFAULT_ANTHROPIC_API_URL.to_string()),
            max_tokens: parse_or("ANTHROPIC_MAX_TOKENS", get("ANTHROPIC_MAX_TOKENS"), 1024)?,
            temperature: parse_or("ANTHROPIC_TEMPERATURE", get("ANTHROPIC_TEMPERATURE"), 0.7)?,
        };

        let usda = UsdaConfig {
            api_key: usda_key,
            base_url: get("USDA_API_URL").unwrap_or_else(|| DEFAULT_USDA_API_URL.to_string()),
        };

        let embedding = EmbeddingConfig {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_EMBEDDING_MODEL.to_string()),
        };

        let top_k = parse_or("RAG_TOP_K", get("RAG_TOP_K"), DEFAULT_TOP_K)?;
        if top_k == 0 {
            return Err(ConfigError::Invalid { var: "RAG_TOP_K", value: "0".to_string() });
        }

        Ok(Self {
            provider,
            usda,
            embedding,
            top_k,
            foods_file: get("FOODS_FILE").map(PathBuf::from),
            qdrant_url: get("QDRANT_URL"),
        })
    }

    /// Applies command-line overrides, with the same checks as the env values.
    pub fn apply_overrides(&mut self, foods: Option<PathBuf>, top_k: Option<usize>) -> Result<(), ConfigError> {
        if let Some(top_k) = top_k {
            if top_k == 0 {
                return Err(ConfigError::Invalid { var: "--top-k", value: "0".to_string() });
            }
            self.top_k = top_k;
        }
        if foods.is_some() {
            self.foods_file = foods;
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
