//! Client configuration

use std::env;

/// Configuration for connecting to the management API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Optional image proxy base URL, tried when a direct image
    /// download fails
    pub image_proxy: Option<String>,

    /// Per-image download timeout in seconds
    pub image_timeout: u64,
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            image_proxy: None,
            image_timeout: 8,
        }
    }

    /// Load from environment variables (reads a `.env` file if present)
    ///
    /// * `COTIZA_API_URL` - base URL (required)
    /// * `COTIZA_API_TOKEN` - bearer token
    /// * `COTIZA_TIMEOUT_SECS` - request timeout
    /// * `COTIZA_IMAGE_PROXY` - image proxy base URL
    /// * `COTIZA_IMAGE_TIMEOUT_SECS` - per-image download timeout
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let base_url = env::var("COTIZA_API_URL")
            .map_err(|_| anyhow::anyhow!("COTIZA_API_URL is not set"))?;

        let mut config = Self::new(base_url);
        if let Ok(token) = env::var("COTIZA_API_TOKEN") {
            config.token = Some(token);
        }
        if let Ok(timeout) = env::var("COTIZA_TIMEOUT_SECS") {
            config.timeout = timeout.parse()?;
        }
        if let Ok(proxy) = env::var("COTIZA_IMAGE_PROXY") {
            config.image_proxy = Some(proxy);
        }
        if let Ok(timeout) = env::var("COTIZA_IMAGE_TIMEOUT_SECS") {
            config.image_timeout = timeout.parse()?;
        }
        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the image proxy base URL
    pub fn with_image_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.image_proxy = Some(proxy.into());
        self
    }

    /// Set the per-image download timeout
    pub fn with_image_timeout(mut self, seconds: u64) -> Self {
        self.image_timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
