//! Configuration management for the reader client.
//!
//! This module provides a centralized configuration system with:
//! - Type-safe configuration management
//! - Environment variable integration
//! - Builder pattern for easy setup
//! - Configuration validation
//!
//! The resource base path lives here rather than in a global constant so the
//! markup rewriter and the avatar resolver can be constructed from it.
//!
//! ## Usage
//!
//! ```rust
//! use wechat_reader_rs::config::{Config, HttpConfig, ResourceConfig};
//! use wechat_reader_rs::Result;
//!
//! fn example() -> Result<()> {
//!     let config = Config::builder()
//!         .http(HttpConfig::builder()
//!             .base_url("https://reader.example.com".to_string())
//!             .request_timeout_secs(60)
//!             .build())
//!         .resources(ResourceConfig::builder()
//!             .res_base_url("/static/res/logo/".to_string())
//!             .build())
//!         .build();
//!     config.validate()?;
//!
//!     // Load from environment variables
//!     let config = Config::from_env()?;
//!     Ok(())
//! }
//! ```

use crate::error::{Result, ReaderError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default resource proxy base path served by the backend.
pub const DEFAULT_RES_BASE_URL: &str = "/static/res/logo/";

/// Main configuration structure for the reader client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Resource proxy configuration
    pub resources: ResourceConfig,
}

/// HTTP client configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,
    /// Base URL of the reader backend (default: "http://127.0.0.1:8001")
    pub base_url: String,
    /// User agent string for requests
    pub user_agent: String,
}

/// Resource proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Prefix under which the backend relays external images (default: "/static/res/logo/")
    pub res_base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            base_url: "http://127.0.0.1:8001".to_string(),
            user_agent: format!("wechat-reader-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            res_base_url: DEFAULT_RES_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // HTTP settings
        if let Ok(val) = std::env::var("READER_BASE_URL") {
            config.http.base_url = val;
        }

        if let Ok(val) = std::env::var("READER_REQUEST_TIMEOUT") {
            config.http.request_timeout_secs = val
                .parse()
                .map_err(|_| ReaderError::config_error("Invalid READER_REQUEST_TIMEOUT value"))?;
        }

        if let Ok(val) = std::env::var("READER_CONNECT_TIMEOUT") {
            config.http.connect_timeout_secs = val
                .parse()
                .map_err(|_| ReaderError::config_error("Invalid READER_CONNECT_TIMEOUT value"))?;
        }

        if let Ok(val) = std::env::var("READER_USER_AGENT") {
            config.http.user_agent = val;
        }

        // Resource settings
        if let Ok(val) = std::env::var("READER_RES_BASE_URL") {
            config.resources.res_base_url = val;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for consistency and constraints.
    pub fn validate(&self) -> Result<()> {
        if self.http.request_timeout_secs == 0 {
            return Err(ReaderError::config_error(
                "request_timeout_secs must be greater than 0",
            ));
        }

        if self.http.connect_timeout_secs == 0 {
            return Err(ReaderError::config_error(
                "connect_timeout_secs must be greater than 0",
            ));
        }

        if self.http.base_url.is_empty() {
            return Err(ReaderError::config_error("base_url cannot be empty"));
        }

        url::Url::parse(&self.http.base_url)
            .map_err(|e| ReaderError::config_error(format!("base_url is not a valid URL: {e}")))?;

        if self.resources.res_base_url.is_empty() {
            return Err(ReaderError::config_error("res_base_url cannot be empty"));
        }

        Ok(())
    }

    /// Converts HTTP timeout to Duration types for easier use.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Converts HTTP timeout to Duration types for easier use.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }
}

/// Builder for creating Config instances.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    http: Option<HttpConfig>,
    resources: Option<ResourceConfig>,
}

impl ConfigBuilder {
    /// Sets the HTTP configuration.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the resource proxy configuration.
    pub fn resources(mut self, resources: ResourceConfig) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Config {
        Config {
            http: self.http.unwrap_or_default(),
            resources: self.resources.unwrap_or_default(),
        }
    }
}

impl HttpConfig {
    /// Creates a new HTTP config builder.
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

impl ResourceConfig {
    /// Creates a new resource config builder.
    pub fn builder() -> ResourceConfigBuilder {
        ResourceConfigBuilder::default()
    }
}

/// Builder for HttpConfig.
#[derive(Debug, Default)]
pub struct HttpConfigBuilder {
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    base_url: Option<String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.request_timeout_secs = Some(timeout);
        self
    }

    pub fn connect_timeout_secs(mut self, timeout: u64) -> Self {
        self.connect_timeout_secs = Some(timeout);
        self
    }

    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn user_agent(mut self, agent: String) -> Self {
        self.user_agent = Some(agent);
        self
    }

    pub fn build(self) -> HttpConfig {
        let default = HttpConfig::default();
        HttpConfig {
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(default.connect_timeout_secs),
            base_url: self.base_url.unwrap_or(default.base_url),
            user_agent: self.user_agent.unwrap_or(default.user_agent),
        }
    }
}

/// Builder for ResourceConfig.
#[derive(Debug, Default)]
pub struct ResourceConfigBuilder {
    res_base_url: Option<String>,
}

impl ResourceConfigBuilder {
    pub fn res_base_url(mut self, base: String) -> Self {
        self.res_base_url = Some(base);
        self
    }

    pub fn build(self) -> ResourceConfig {
        ResourceConfig {
            res_base_url: self
                .res_base_url
                .unwrap_or_else(|| DEFAULT_RES_BASE_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.http.request_timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.resources.res_base_url, "/static/res/logo/");
        assert!(config.http.user_agent.starts_with("wechat-reader-rs/"));
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .http(
                HttpConfig::builder()
                    .base_url("https://reader.example.com".to_string())
                    .request_timeout_secs(5)
                    .build(),
            )
            .resources(
                ResourceConfig::builder()
                    .res_base_url("/proxy/img/".to_string())
                    .build(),
            )
            .build();

        assert_eq!(config.http.base_url, "https://reader.example.com");
        assert_eq!(config.http.request_timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.resources.res_base_url, "/proxy/img/");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.http.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.base_url = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.resources.res_base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    // Both environment cases share one test so they never race on the same variables.
    #[test]
    fn test_environment_loading() {
        unsafe {
            std::env::set_var("READER_BASE_URL", "https://reader.example.com");
            std::env::set_var("READER_REQUEST_TIMEOUT", "60");
            std::env::set_var("READER_RES_BASE_URL", "/res/");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.http.base_url, "https://reader.example.com");
        assert_eq!(config.http.request_timeout_secs, 60);
        assert_eq!(config.resources.res_base_url, "/res/");

        unsafe {
            std::env::set_var("READER_REQUEST_TIMEOUT", "soon");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            std::env::remove_var("READER_BASE_URL");
            std::env::remove_var("READER_REQUEST_TIMEOUT");
            std::env::remove_var("READER_RES_BASE_URL");
        }
    }
}
