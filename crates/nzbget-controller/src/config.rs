//! Client configuration.

use std::{env, fmt, path::PathBuf, time::Duration};

use nzbget_types::NzbGetError;

/// Endpoint used when none is configured.
pub const DEFAULT_URL: &str = "http://localhost:6789/jsonrpc";

/// Deadline for a single RPC or query call.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for fetching a remote NZB file, body included.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for [`NzbGetClient`](crate::NzbGetClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the JSON-RPC endpoint, e.g. `http://localhost:6789/jsonrpc`.
    pub url: String,
    /// Basic auth user name.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Deadline for RPC and query calls.
    pub rpc_timeout: Duration,
    /// Deadline for fetching remote NZB files.
    pub fetch_timeout: Duration,
    /// Directory for the temporary copies of fetched NZB files. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            temp_dir: None,
        }
    }
}

impl ClientConfig {
    /// Returns the default configuration pointed at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets basic auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Reads the configuration from the environment.
    ///
    /// Recognised variables: `NZBGET_URL`, `NZBGET_USERNAME`, `NZBGET_PASSWORD`,
    /// `NZBGET_TIMEOUT_SECS`, `NZBGET_FETCH_TIMEOUT_SECS` and `NZBGET_TEMP_DIR`. Unset variables
    /// keep their defaults.
    pub fn from_env() -> Result<Self, NzbGetError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, NzbGetError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            url: non_empty("NZBGET_URL").unwrap_or(defaults.url),
            username: non_empty("NZBGET_USERNAME"),
            password: non_empty("NZBGET_PASSWORD"),
            rpc_timeout: seconds(non_empty("NZBGET_TIMEOUT_SECS"), "NZBGET_TIMEOUT_SECS")?
                .unwrap_or(defaults.rpc_timeout),
            fetch_timeout: seconds(
                non_empty("NZBGET_FETCH_TIMEOUT_SECS"),
                "NZBGET_FETCH_TIMEOUT_SECS",
            )?
            .unwrap_or(defaults.fetch_timeout),
            temp_dir: non_empty("NZBGET_TEMP_DIR").map(PathBuf::from),
        })
    }
}

fn seconds(value: Option<String>, key: &str) -> Result<Option<Duration>, NzbGetError> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| NzbGetError::Config(format!("{key}={v}: {e}")))
        })
        .transpose()
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print credentials.
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_some() {
                    "<set>"
                } else {
                    "<unset>"
                },
            )
            .field("rpc_timeout", &self.rpc_timeout)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}
