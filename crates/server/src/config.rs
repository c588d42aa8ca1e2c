//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (server)
//! - `WINBACK_HOST` - Bind address (default: 127.0.0.1)
//! - `WINBACK_PORT` - Listen port (default: 3001)
//!
//! ## Optional (Shopify - both must be set together)
//! - `SHOPIFY_STORE_DOMAIN` - Store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token
//! - `SHOPIFY_API_VERSION` - REST API version (default: 2024-01)
//!
//! ## Optional (MailerLite)
//! - `MAILERLITE_API_KEY` - MailerLite API token
//!
//! ## Optional (OpenAI)
//! - `OPENAI_API_KEY` - `OpenAI` API key
//! - `OPENAI_MODEL` - Chat model (default: gpt-4o-mini)
//!
//! ## Optional (limits)
//! - `MAX_CUSTOMERS_ANALYZED` - Cap for the customers endpoint (default: 1000)
//! - `MAX_CUSTOMERS_FOR_AI` - Cap on the segment sent to the LLM (default: 250)
//! - `MAX_BATCH_CUSTOMERS` - Cap for the batch workflow (default: 10000)
//!
//! ## Optional (Sentry)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! Every upstream credential is optional: endpoints that need an
//! unconfigured credential answer 400 instead of failing at startup.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default chat model when `OPENAI_MODEL` is unset.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Shopify REST API version segment.
pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-01";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Immutable application configuration, built once at startup and threaded
/// through `AppState` - business logic never reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration (optional)
    pub shopify: Option<ShopifyConfig>,
    /// MailerLite configuration (optional)
    pub mailerlite: Option<MailerLiteConfig>,
    /// `OpenAI` configuration (optional)
    pub openai: Option<OpenAiConfig>,
    /// Workflow size caps
    pub limits: Limits,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin REST API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// REST API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyConfig {
    /// Both `SHOPIFY_STORE_DOMAIN` and `SHOPIFY_ACCESS_TOKEN` must be set
    /// together; a lone one is a config error, not a silent disable.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let store = get_optional_env("SHOPIFY_STORE_DOMAIN");
        let token = get_optional_env("SHOPIFY_ACCESS_TOKEN");

        match (store, token) {
            (Some(store), Some(token)) => {
                if let Err(e) = validate_secret_strength(&token, "SHOPIFY_ACCESS_TOKEN") {
                    tracing::warn!("SHOPIFY_ACCESS_TOKEN validation warning: {e}");
                }
                Ok(Some(Self {
                    store,
                    api_version: get_env_or_default(
                        "SHOPIFY_API_VERSION",
                        DEFAULT_SHOPIFY_API_VERSION,
                    ),
                    access_token: SecretString::from(token),
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_*".to_string(),
                "Both SHOPIFY_STORE_DOMAIN and SHOPIFY_ACCESS_TOKEN must be set together"
                    .to_string(),
            )),
        }
    }
}

/// MailerLite API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MailerLiteConfig {
    /// MailerLite API token
    pub api_key: SecretString,
}

impl std::fmt::Debug for MailerLiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerLiteConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl MailerLiteConfig {
    fn from_env() -> Option<Self> {
        get_optional_env("MAILERLITE_API_KEY").map(|key| {
            if let Err(e) = validate_secret_strength(&key, "MAILERLITE_API_KEY") {
                tracing::warn!("MAILERLITE_API_KEY validation warning: {e}");
            }
            Self {
                api_key: SecretString::from(key),
            }
        })
    }
}

/// `OpenAI` API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// `OpenAI` API key
    pub api_key: SecretString,
    /// Chat model (e.g., gpt-4o-mini)
    pub model: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiConfig {
    fn from_env() -> Option<Self> {
        get_optional_env("OPENAI_API_KEY").map(|key| {
            if let Err(e) = validate_secret_strength(&key, "OPENAI_API_KEY") {
                tracing::warn!("OPENAI_API_KEY validation warning: {e}");
            }
            Self {
                api_key: SecretString::from(key),
                model: get_env_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            }
        })
    }
}

/// Size caps for the workflow endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum customers fetched by `/api/shopify/customers`.
    pub max_customers_analyzed: usize,
    /// Maximum customers forwarded to the LLM per analyze call.
    pub max_customers_for_ai: usize,
    /// Maximum customers fetched by the batch workflow.
    pub max_batch_customers: usize,
}

impl Limits {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_customers_analyzed: get_parsed_or_default("MAX_CUSTOMERS_ANALYZED", 1000)?,
            max_customers_for_ai: get_parsed_or_default("MAX_CUSTOMERS_FOR_AI", 250)?,
            max_batch_customers: get_parsed_or_default("MAX_BATCH_CUSTOMERS", 10_000)?,
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or a paired
    /// credential is half-set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WINBACK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WINBACK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WINBACK_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WINBACK_PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyConfig::from_env()?;
        let mailerlite = MailerLiteConfig::from_env();
        let openai = OpenAiConfig::from_env();
        let limits = Limits::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            shopify,
            mailerlite,
            openai,
            limits,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The configured chat model name, falling back to the default when
    /// `OpenAI` is unconfigured (shown by the health endpoint).
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.openai
            .as_ref()
            .map_or(DEFAULT_OPENAI_MODEL, |c| c.model.as_str())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric environment variable with a default value.
fn get_parsed_or_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
