//! HTTP plumbing for the reader backend.
//!
//! This module provides:
//! - [`ApiRequest`], a transport-neutral description of one backend call
//! - [`ApiEnvelope`], the `{code, message, data}` wrapper the backend answers with
//! - [`ReaderHttpClient`], the reqwest-backed [`Transport`]
//!
//! Requests are sent once. Transport failures and non-2xx statuses are
//! returned to the caller as they are; nothing is retried.

use crate::config::Config;
use crate::error::{ReaderError, Result};
use crate::traits::Transport;
use crate::utils::{generate_request_id, join_url};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// HTTP methods used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One backend call: method, path relative to the base URL, query pairs and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a query parameter only when a value is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Standard backend response structure.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    /// Status code (0 for success)
    #[serde(default)]
    pub code: i64,
    /// Human readable status
    #[serde(default)]
    pub message: String,
    /// Payload
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Converts the envelope to a Result, checking the status code.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.code == 0 {
            Ok(self.data)
        } else {
            Err(ReaderError::from_api_response(self.code, self.message))
        }
    }
}

/// Unwraps `{code, message, data}` bodies. Bodies without a top-level `code`
/// are returned unchanged.
pub fn unwrap_envelope(body: Value) -> Result<Value> {
    if body.get("code").is_none() {
        return Ok(body);
    }
    let envelope: ApiEnvelope<Value> = serde_json::from_value(body)?;
    Ok(envelope.into_result()?.unwrap_or(Value::Null))
}

/// reqwest-backed client for the reader backend.
#[derive(Debug, Clone)]
pub struct ReaderHttpClient {
    client: Client,
    config: Config,
}

impl ReaderHttpClient {
    /// Creates a client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a client with a custom configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.http.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.http.base_url, path)
    }

    /// Sends a request and returns the unwrapped payload.
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path);
        let request_id = generate_request_id();
        debug!("{} {} (request {})", request.method, url, request_id);

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header("X-Request-Id", request_id.as_str());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(
                "{} {} failed with HTTP {} (request {})",
                request.method, url, status, request_id
            );
            return Err(ReaderError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        unwrap_envelope(body).inspect_err(|e| {
            warn!("{} {} rejected: {} (request {})", request.method, url, e, request_id);
        })
    }
}

#[async_trait::async_trait]
impl Transport for ReaderHttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        self.send(&request).await
    }
}
