use serde::Deserialize;

/// Configuration for the hosted language-model endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

/// Top-level application configuration, loaded from `config.yaml` plus
/// environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
    /// Key material for session, identity and flash-message cookies.
    pub secret_key: String,
    pub ai: AiConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AppConfig {
    /// Reads `config.yaml` (if present) and environment variables with the
    /// `CC__` prefix, e.g. `CC__DATABASE_URL` or `CC__AI__API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CC").separator("__"))
            .build()?
            .try_deserialize()
    }
}
