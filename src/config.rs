use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, checked on every identification request
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Key for the OpenAI-compatible chat completion API
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Chat completion API base URL
    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    /// Model used for keyword/title extraction
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Language/region preference sent with every movie search
    #[serde(default = "default_search_language")]
    pub search_language: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_llm_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_search_language() -> String {
    "pt-BR".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map(Config::normalized)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Treats blank credentials the same as missing ones
    fn normalized(mut self) -> Self {
        self.tmdb_api_key = non_blank(self.tmdb_api_key);
        self.openai_api_key = non_blank(self.openai_api_key);
        self
    }

    /// Names of the credentials that are not configured
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tmdb_api_key.is_none() {
            missing.push("TMDB_API_KEY");
        }
        if self.openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        missing
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
