use std::env;
use secrecy::SecretString;

pub const DEFAULT_LLM_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SERPER_ENDPOINT: &str = "https://google.serper.dev/search";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Caps applied by the pipelines. The query caps protect the third-party
/// rate limits and must not be raised without checking the providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineLimits {
    pub max_upload_bytes: usize,
    pub query_count: usize,
    pub max_query_chars: usize,
    pub web_query_cap: usize,
    pub repository_query_cap: usize,
    pub results_per_query: usize,
    pub query_source_chars: usize,
    pub analysis_source_chars: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            query_count: 3,
            max_query_chars: 250,
            web_query_cap: 2,
            repository_query_cap: 1,
            results_per_query: 5,
            query_source_chars: 1000,
            analysis_source_chars: 5000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub llm_api_key: SecretString,
    pub llm_api_base: String,
    pub llm_model: String,
    pub serper_api_key: SecretString,
    pub serper_endpoint: String,
    pub github_token: Option<SecretString>,
    pub mongo_conn_string: Option<String>,
    pub mongo_db_name: String,
    pub reports_collection: String,
    pub archive_enabled: bool,
    pub limits: PipelineLimits,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PipelineLimits::default();

        Self {
            web_server_host: env_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env_parsed("WEB_SERVER_PORT", 8080),
            cors_allowed_origin: env_or("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            llm_api_key: SecretString::from(env_or("LLM_API_KEY", "")),
            llm_api_base: env_or("LLM_API_BASE", DEFAULT_LLM_API_BASE),
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            serper_api_key: SecretString::from(env_or("SERPER_API_KEY", "")),
            serper_endpoint: env_or("SERPER_ENDPOINT", DEFAULT_SERPER_ENDPOINT),
            github_token: env_non_empty("GITHUB_TOKEN").map(SecretString::from),
            mongo_conn_string: env_non_empty("MONGO_CONN_STRING"),
            mongo_db_name: env_or("MONGO_DB_NAME", "papercheck"),
            reports_collection: env_or("REPORTS_COLLECTION", "reports"),
            archive_enabled: env_parsed("ARCHIVE_ENABLED", true),
            limits: PipelineLimits {
                max_upload_bytes: env_parsed("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
                web_query_cap: env_parsed("WEB_QUERY_CAP", defaults.web_query_cap),
                repository_query_cap: env_parsed(
                    "REPOSITORY_QUERY_CAP",
                    defaults.repository_query_cap,
                ),
                results_per_query: env_parsed("RESULTS_PER_QUERY", defaults.results_per_query),
                ..defaults
            },
        }
    }

    /// Archive writes need both a connection string and the feature switch.
    pub fn archive_configured(&self) -> bool {
        self.archive_enabled && self.mongo_conn_string.is_some()
    }

    /// Logs a warning for every collaborator credential still unset.
    /// The server can start without them, but the matching calls will fail.
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if self.llm_api_key.expose_secret().trim().is_empty() {
            log::warn!("LLM_API_KEY is not set; every generation call will be rejected upstream");
        }

        if self.serper_api_key.expose_secret().trim().is_empty() {
            log::warn!("SERPER_API_KEY is not set; web search will return no candidates");
        }

        if self.github_token.is_none() {
            log::warn!("GITHUB_TOKEN is not set; repository search runs unauthenticated");
        }

        if self.archive_enabled && self.mongo_conn_string.is_none() {
            log::info!("MONGO_CONN_STRING is not set; report archiving is disabled");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            llm_api_key: SecretString::from("test-llm-key".to_string()),
            llm_api_base: "http://127.0.0.1:9/v1".to_string(),
            llm_model: "test-model".to_string(),
            serper_api_key: SecretString::from("test-serper-key".to_string()),
            serper_endpoint: "http://127.0.0.1:9/search".to_string(),
            github_token: None,
            mongo_conn_string: None,
            mongo_db_name: "papercheck-test".to_string(),
            reports_collection: "reports".to_string(),
            archive_enabled: false,
            limits: PipelineLimits::default(),
        }
    }
}
