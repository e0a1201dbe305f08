//! Settings and their loader.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use reddit_types::{Credentials, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Project-level config file looked up in the working directory.
pub const CONFIG_FILE: &str = "reddit-mcp.toml";

const REDDIT_KEYS: [&str; 5] = [
    "client_id",
    "client_secret",
    "user_agent",
    "username",
    "password",
];
const RUNTIME_KEYS: [&str; 2] = ["call_timeout_secs", "rest_bind"];

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Reddit API credentials, `[reddit]`.
    #[serde(default)]
    pub reddit: RedditSettings,
    /// Client and REST runtime knobs, `[runtime]`.
    #[serde(default)]
    pub runtime: RuntimeSettings,
}

/// The `[reddit]` table.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditSettings {
    /// OAuth application id.
    pub client_id: Option<String>,
    /// OAuth application secret.
    pub client_secret: Option<String>,
    /// User agent for API requests.
    pub user_agent: Option<String>,
    /// Account name; enables the mutating tools together with `password`.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
}

impl fmt::Debug for RedditSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("RedditSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .finish()
    }
}

/// The `[runtime]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Upper bound on one tool call made through the MCP client.
    pub call_timeout_secs: u64,
    /// Listen address of the REST surface.
    pub rest_bind: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            call_timeout_secs: 30,
            rest_bind: "0.0.0.0:8000".into(),
        }
    }
}

impl Settings {
    /// Load from `reddit-mcp.toml` (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with an explicit config file instead of `reddit-mcp.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Self = Self::figment(config_path).extract().map_err(Box::new)?;
        tracing::debug!(
            reddit = ?settings.reddit,
            runtime = ?settings.runtime,
            "loaded settings"
        );
        Ok(settings)
    }

    /// The merged provider stack, for callers that extract their own view.
    #[must_use]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        let file = config_path.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);
        if file.exists() {
            figment = figment.merge(Toml::file(&file));
        }

        figment
            .merge(
                Env::prefixed("REDDIT_")
                    .only(&REDDIT_KEYS)
                    .map(|key| format!("reddit.{key}").into()),
            )
            .merge(
                Env::prefixed("REDDIT_MCP_")
                    .only(&RUNTIME_KEYS)
                    .map(|key| format!("runtime.{key}").into()),
            )
    }

    /// Credentials for the adapter.
    ///
    /// Logs a warning when no account login is configured, since the
    /// mutating tools will then refuse to run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] without a client id or secret.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let client_id =
            non_blank(&self.reddit.client_id).ok_or(ConfigError::Missing("REDDIT_CLIENT_ID"))?;
        let client_secret = non_blank(&self.reddit.client_secret)
            .ok_or(ConfigError::Missing("REDDIT_CLIENT_SECRET"))?;
        let user_agent = non_blank(&self.reddit.user_agent).unwrap_or(DEFAULT_USER_AGENT);

        let mut credentials =
            Credentials::read_only(client_id, client_secret).with_user_agent(user_agent);
        credentials.username = self.reddit.username.clone();
        credentials.password = self.reddit.password.clone();

        if !credentials.can_write() {
            tracing::warn!(
                "REDDIT_USERNAME/REDDIT_PASSWORD not set: running read-only, \
                 post_comment and create_post will be refused"
            );
        }
        Ok(credentials)
    }

    /// Per-call timeout for the MCP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero timeout.
    pub fn call_timeout(&self) -> Result<Duration, ConfigError> {
        match self.runtime.call_timeout_secs {
            0 => Err(ConfigError::Invalid {
                name: "REDDIT_MCP_CALL_TIMEOUT_SECS",
                reason: "must be at least 1 second".into(),
            }),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// REST listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn rest_bind(&self) -> Result<SocketAddr, ConfigError> {
        self.runtime
            .rest_bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "REDDIT_MCP_REST_BIND",
                reason: e.to_string(),
            })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.call_timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(settings.rest_bind().unwrap(), "0.0.0.0:8000".parse().unwrap());
    }

    #[test]
    fn credentials_require_id_and_secret() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.credentials(),
            Err(ConfigError::Missing("REDDIT_CLIENT_ID"))
        ));
        settings.reddit.client_id = Some("id".into());
        settings.reddit.client_secret = Some("  ".into());
        assert!(matches!(
            settings.credentials(),
            Err(ConfigError::Missing("REDDIT_CLIENT_SECRET"))
        ));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut settings = Settings::default();
        settings.runtime.call_timeout_secs = 0;
        assert!(matches!(settings.call_timeout(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn debug_redacts_secrets() {
        let reddit = RedditSettings {
            client_secret: Some("s3cr3t".into()),
            password: Some("hunter2".into()),
            ..Default::default()
        };
        let debug = format!("{reddit:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("hunter2"));
    }
}
