use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Generation gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Webpage/image fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Configuration for the Gemini generation gateway
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// API key for the generative language service.
    /// Falls back to GEMINI_API_KEY / GOOGLE_API_KEY environment variables.
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Base URL for the API endpoint (overridable for tests or proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            base_url: default_base_url(),
        }
    }
}

impl GatewayConfig {
    /// Resolve the API key from config or environment.
    ///
    /// Lookup order: configured value, then GEMINI_API_KEY, then
    /// GOOGLE_API_KEY.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup("GEMINI_API_KEY"))
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|k| !k.trim().is_empty())
    }
}

/// Configuration for outbound page and image fetches
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
    /// User-Agent header sent with fetches; some sites block non-browser agents
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALMATE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALMATE__GATEWAY__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

// Double underscore throughout: MEALMATE__GATEWAY__MODEL
fn env_source() -> Environment {
    Environment::with_prefix("MEALMATE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
