//! Client configuration
use std::env;
use std::time::Duration;

/// Name of the environment variable consulted for a default API token.
pub const TOKEN_ENV_VAR: &str = "GOFILE_API_TOKEN";

const DEFAULT_BASE_URL: &str = "https://api.gofile.io";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_COUNT: u32 = 3;

/// Configuration for a [`GofileClient`].
///
/// The configuration is read once at client construction and never mutated
/// afterwards, so a single client can be shared freely between concurrent
/// calls.
///
/// [`GofileClient`]: crate::client::GofileClient
#[derive(Clone)]
pub struct ClientConfig {
    /// The bearer token used to authenticate with the API.  When not supplied
    /// the `GOFILE_API_TOKEN` environment variable is consulted at
    /// construction time.  Requests made without a token fail with
    /// [`GofileError::NotAuthenticated`].
    ///
    /// [`GofileError::NotAuthenticated`]: crate::error::GofileError::NotAuthenticated
    pub api_token: Option<String>,
    /// The server URL to use for everything except file uploads.  This is not
    /// normally needed but can be used for testing purposes.
    pub base_url: String,
    /// Overrides the `https://{server}.gofile.io/contents/uploadfile` upload
    /// URL.  This is not normally needed but can be used for testing purposes.
    pub upload_base_url: Option<String>,
    /// How many times a request is retried after a network-level failure.
    /// Upload requests are never retried.
    pub retry_count: u32,
    /// Deadline applied to every non-upload request.
    pub timeout: Duration,
    /// Deadline applied to upload requests.  `None` (the default) leaves
    /// uploads without a deadline since large files may legitimately take
    /// longer than [`timeout`](Self::timeout).
    pub upload_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: env::var(TOKEN_ENV_VAR).ok(),
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_base_url: None,
            retry_count: DEFAULT_RETRY_COUNT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            upload_timeout: None,
        }
    }
}

// Custom implementation of Debug to avoid printing the token
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "**********"))
            .field("base_url", &self.base_url)
            .field("upload_base_url", &self.upload_base_url)
            .field("retry_count", &self.retry_count)
            .field("timeout", &self.timeout)
            .field("upload_timeout", &self.upload_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration that authenticates with the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            api_token: Some(token.into()),
            ..Default::default()
        }
    }
}
