//! Connection and client configuration.

use std::time::Duration;

/// Default per-request timeout for the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and target of one TeamPasswordManager session.
///
/// Built from the three positional lookup terms plus the optional `reason=`
/// term. The unlock reason stays `None` unless the caller supplied one; the
/// API treats an absent reason differently from an empty one.
///
/// ```
/// use tpmstore::ConnectionParams;
///
/// let conn = ConnectionParams::new("https://tpm.example.com", "ansible", "s3cret")
///     .with_unlock_reason("deploy");
/// assert_eq!(conn.unlock_reason.as_deref(), Some("deploy"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Base URL of the TeamPasswordManager installation
    pub url: String,
    /// API user
    pub username: String,
    /// API password
    pub password: String,
    /// Audit reason required to read locked entries
    pub unlock_reason: Option<String>,
}

impl ConnectionParams {
    /// Creates connection parameters without an unlock reason.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            unlock_reason: None,
        }
    }

    /// Sets the unlock reason sent with every request.
    pub fn with_unlock_reason(mut self, reason: impl Into<String>) -> Self {
        self.unlock_reason = Some(reason.into());
        self
    }

    /// Returns the URL with any `user:pass@` userinfo removed, for logging.
    ///
    /// ```
    /// use tpmstore::ConnectionParams;
    ///
    /// let conn = ConnectionParams::new("https://bob:pw@tpm.example.com/tpm", "u", "p");
    /// assert_eq!(conn.display_url(), "https://tpm.example.com/tpm");
    /// ```
    pub fn display_url(&self) -> String {
        let (scheme, rest) = match self.url.split_once("://") {
            Some((scheme, rest)) => (Some(scheme), rest),
            None => (None, self.url.as_str()),
        };
        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, tail) = rest.split_at(authority_end);
        let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

        match scheme {
            Some(scheme) => format!("{}://{}{}", scheme, host, tail),
            None => format!("{}{}", host, tail),
        }
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("url", &self.display_url())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("unlock_reason", &self.unlock_reason)
            .finish()
    }
}

/// Tuning knobs for the HTTP client.
///
/// ```
/// use tpmstore::ClientOptions;
/// use std::time::Duration;
///
/// let opts = ClientOptions::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("deploy-bot/1.0");
/// assert_eq!(opts.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Per-request timeout (default: 30 seconds)
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("tpmstore/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
