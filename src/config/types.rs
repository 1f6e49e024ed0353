use serde::Deserialize;

/// Default portal endpoint for placement lookups
pub const DEFAULT_PORTAL_ENDPOINT: &str = "https://portal.ju.edu.et/freshmanR";

/// Main configuration structure for Placement-Bot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
}

/// Results portal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Page that renders the placement table
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Query parameter carrying the identifier
    #[serde(rename = "query-param", default = "default_query_param")]
    pub query_param: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent to the portal
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Skip TLS certificate verification (the portal has served broken chains)
    #[serde(rename = "accept-invalid-certs", default)]
    pub accept_invalid_certs: bool,
}

/// Chat bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token; usually supplied through BOT_TOKEN instead
    #[serde(default)]
    pub token: Option<String>,

    /// Base URL of the Bot API
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,

    /// Long-poll timeout passed to getUpdates (seconds)
    #[serde(rename = "poll-timeout-secs", default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

/// Duplicate-delivery suppression
#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    /// Window within which a repeated message id is dropped (milliseconds)
    #[serde(rename = "window-ms", default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_PORTAL_ENDPOINT.to_string()
}

fn default_query_param() -> String {
    "AdmissionNumber".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("placement-bot/{}", env!("CARGO_PKG_VERSION"))
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_window_ms() -> u64 {
    1000
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            query_param: default_query_param(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
        }
    }
}
