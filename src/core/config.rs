//! Client configuration
//!
//! A [`Config`] can be built in code, loaded from a TOML file or read from
//! `WFIRMA_*` environment variables. It is validated once, when a client is
//! constructed, and never changes afterwards.

use crate::core::constants::{env, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Credentials used to authenticate every request
///
/// Exactly one mode is active per client.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `accessKey` / `secretKey` / `appKey` headers
    ApiKey {
        access_key: String,
        secret_key: String,
        app_key: String,
    },

    /// `Authorization: Bearer` header plus `oauth_version=2`
    OAuth2 { token: String },
}

impl Credentials {
    pub fn api_key(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Credentials::ApiKey {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            app_key: app_key.into(),
        }
    }

    pub fn oauth2(token: impl Into<String>) -> Self {
        Credentials::OAuth2 {
            token: token.into(),
        }
    }

    /// Picks a credential mode from optional parts
    ///
    /// A bearer token takes precedence. The API-key mode needs all three
    /// keys; a partial trio yields `None`.
    pub fn resolve(
        oauth_token: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        app_key: Option<String>,
    ) -> Option<Self> {
        if let Some(token) = oauth_token {
            return Some(Credentials::oauth2(token));
        }
        match (access_key, secret_key, app_key) {
            (Some(access), Some(secret), Some(app)) => Some(Credentials::api_key(access, secret, app)),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey { access_key, .. } => f
                .debug_struct("ApiKey")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .field("app_key", &"<redacted>")
                .finish(),
            Credentials::OAuth2 { .. } => f
                .debug_struct("OAuth2")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiKeySection {
    access_key: String,
    secret_key: String,
    app_key: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OAuth2Section {
    token: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct TomlConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default = "default_timeout")]
    timeout: u64,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    api_key: Option<ApiKeySection>,
    #[serde(default)]
    oauth2: Option<OAuth2Section>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

/// wFirma client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Company to act on for multi-company accounts
    pub company_id: Option<String>,

    /// Authentication; a client refuses to start without it
    pub credentials: Option<Credentials>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Logging level used by binaries
    pub log_level: String,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Config {
    /// Configuration for `base_url` with no credentials and default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            company_id: None,
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: default_log_level(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_company_id(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_api_key(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::api_key(access_key, secret_key, app_key));
        self
    }

    pub fn with_oauth2_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::oauth2(token));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Both `[api_key]` and `[oauth2]` sections are present
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        let credentials = match (config.api_key, config.oauth2) {
            (Some(_), Some(_)) => {
                anyhow::bail!("Configure either [api_key] or [oauth2], not both")
            }
            (Some(keys), None) => Some(Credentials::api_key(
                keys.access_key,
                keys.secret_key,
                keys.app_key,
            )),
            (None, Some(oauth)) => Some(Credentials::oauth2(oauth.token)),
            (None, None) => None,
        };

        Ok(Config {
            base_url: normalize_base_url(config.base_url),
            company_id: config.company_id.filter(|id| !id.is_empty()),
            credentials,
            timeout: Duration::from_secs(config.timeout),
            log_level: config.log_level,
            headers: config.headers,
        })
    }

    /// Load configuration from `WFIRMA_*` environment variables
    ///
    /// Empty variables count as unset. Credentials are left empty when
    /// neither a token nor a complete key trio is present; the client
    /// reports that when it is constructed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from `WFIRMA_CONFIG` if it is set, otherwise from the environment
    pub fn load() -> Result<Self> {
        match std::env::var(env::CONFIG_PATH) {
            Ok(path) if !path.is_empty() => Self::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path)),
            _ => Self::from_env(),
        }
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Config::new(var(env::API_BASE).unwrap_or_else(default_base_url));
        config.company_id = var(env::COMPANY_ID);
        config.credentials = Credentials::resolve(
            var(env::OAUTH_TOKEN),
            var(env::ACCESS_KEY),
            var(env::SECRET_KEY),
            var(env::APP_KEY),
        );

        if let Some(timeout) = var(env::TIMEOUT) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", env::TIMEOUT))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(level) = var(env::LOG_LEVEL) {
            config.log_level = level;
        }

        Ok(config)
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
