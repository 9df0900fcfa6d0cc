//! Client configuration.
//!
//! A `ClientConfig` is built once and never written to afterwards, so a
//! client holding it can be shared across threads as long as its transport
//! can.

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://haveibeenpwned.com/api/v3/";
pub const DEFAULT_RANGE_URL: &str = "https://api.pwnedpasswords.com/range/";
pub const DEFAULT_USER_AGENT: &str = concat!("pwned-core/", env!("CARGO_PKG_VERSION"));

pub const API_KEY_ENV: &str = "HIBP_API_KEY";
pub const API_URL_ENV: &str = "HIBP_API_URL";
pub const RANGE_URL_ENV: &str = "HIBP_RANGE_URL";

#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) user_agent: String,
    pub(crate) api_key: Option<String>,
    /// Serialised base URLs, already validated by `parse_base_url`.
    pub(crate) api_url: String,
    pub(crate) range_url: String,
    pub(crate) add_padding: bool,
}

impl ClientConfig {
    /// Default endpoints and user agent, no API key.
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            range_url: DEFAULT_RANGE_URL.to_string(),
            add_padding: false,
        }
    }

    /// Read the API key and endpoint overrides from the environment.
    ///
    /// An empty `HIBP_API_KEY` counts as unset.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut config = Self::new().with_api_key(std::env::var(API_KEY_ENV).ok());
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config = config.with_api_url(&url)?;
        }
        if let Ok(url) = std::env::var(RANGE_URL_ENV) {
            config = config.with_range_url(&url)?;
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL for the breach, paste and data-class resources.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ApiError> {
        self.api_url = parse_base_url(url)?.into();
        Ok(self)
    }

    /// Base URL for the password-range resource.
    pub fn with_range_url(mut self, url: &str) -> Result<Self, ApiError> {
        self.range_url = parse_base_url(url)?.into();
        Ok(self)
    }

    /// Ask the range endpoint to pad responses with zero-count entries.
    pub fn with_padding(mut self, add_padding: bool) -> Self {
        self.add_padding = add_padding;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn range_url(&self) -> &str {
        &self.range_url
    }

    pub fn add_padding(&self) -> bool {
        self.add_padding
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("range_url", &self.range_url)
            .field("add_padding", &self.add_padding)
            .finish()
    }
}

pub(crate) fn parse_base_url(url: &str) -> Result<Url, ApiError> {
    let parsed = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;
    if parsed.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{url}: cannot be a base URL")));
    }
    Ok(parsed)
}
