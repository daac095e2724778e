//! Trait abstractions for the reader client.
//!
//! [`Transport`] is the seam between the typed API wrappers and the network.
//! [`ReaderHttpClient`](crate::http::ReaderHttpClient) is the production
//! implementation; tests plug in an in-memory one.

use crate::error::Result;
use crate::http::ApiRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Executes one backend request and returns the unwrapped `data` payload.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` exactly once.
    ///
    /// Implementations must map non-2xx statuses to
    /// [`ReaderError::Status`](crate::ReaderError::Status) and non-zero
    /// envelope codes to [`ReaderError::Api`](crate::ReaderError::Api).
    async fn execute(&self, request: ApiRequest) -> Result<Value>;
}
