//! Reddit API credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "mcp-reddit-agent/0.1";

/// Credentials for the Reddit API.
///
/// Loaded once at startup and shared read-only. Username and password are
/// optional: without them the credentials only allow read access and the
/// mutating tools fail with `PermissionDenied`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// OAuth application id.
    pub client_id: String,
    /// OAuth application secret.
    pub client_secret: String,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Account name for script-app password auth.
    #[serde(default)]
    pub username: Option<String>,
    /// Account password for script-app password auth.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Credentials {
    /// Read-only credentials with the default user agent.
    #[must_use]
    pub fn read_only(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: default_user_agent(),
            username: None,
            password: None,
        }
    }

    /// Add an account login, enabling the mutating tools.
    #[must_use]
    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether these credentials permit writes (both username and password set).
    #[must_use]
    pub fn can_write(&self) -> bool {
        self.login().is_some()
    }

    /// The username/password pair, if both are present and non-blank.
    #[must_use]
    pub fn login(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.trim().is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
