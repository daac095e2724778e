//! Article insights: summary, headings, key points and the LLM breakdown.

use super::{call, null_as_default};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use crate::utils::encode_path_segment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Processing state of an article's insights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum InsightStatus {
    #[default]
    Pending,
    Basic,
    Llm,
    Failed,
    Other(i64),
}

impl From<i64> for InsightStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => InsightStatus::Pending,
            1 => InsightStatus::Basic,
            2 => InsightStatus::Llm,
            9 => InsightStatus::Failed,
            other => InsightStatus::Other(other),
        }
    }
}

impl From<InsightStatus> for i64 {
    fn from(status: InsightStatus) -> Self {
        match status {
            InsightStatus::Pending => 0,
            InsightStatus::Basic => 1,
            InsightStatus::Llm => 2,
            InsightStatus::Failed => 9,
            InsightStatus::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyPoints {
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub points: Vec<String>,
}

/// Insights for one article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default)]
    pub article_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub key_points: Option<KeyPoints>,
    /// Free-form outline produced by the model; `None` unless requested and generated.
    #[serde(default)]
    pub llm_breakdown: Option<Value>,
    #[serde(default)]
    pub status: InsightStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub llm_provider: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub llm_model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl Insights {
    pub fn is_failed(&self) -> bool {
        self.status == InsightStatus::Failed
    }
}

/// Outcome of a batch insights job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub processed: Option<u64>,
    #[serde(default)]
    pub scheduled: Option<u64>,
    #[serde(default)]
    pub limit: u64,
}

pub(crate) fn insights_path(article_id: &str) -> String {
    format!("/wx/insights/{}", encode_path_segment(article_id))
}

/// Authenticated insights endpoints.
#[derive(Clone)]
pub struct InsightsApi {
    transport: Arc<dyn Transport>,
}

impl InsightsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches insights, creating the basic ones on first access.
    pub async fn get_insights(&self, article_id: &str, include_llm: bool) -> Result<Insights> {
        let request = ApiRequest::get(insights_path(article_id)).query("include_llm", include_llm);
        call(self.transport.as_ref(), request).await
    }

    pub async fn refresh_basic_insights(&self, article_id: &str) -> Result<Insights> {
        let request = ApiRequest::post(format!("{}/basic", insights_path(article_id)));
        call(self.transport.as_ref(), request).await
    }

    pub async fn generate_llm_breakdown(&self, article_id: &str) -> Result<Insights> {
        let request = ApiRequest::post(format!("{}/breakdown", insights_path(article_id)));
        call(self.transport.as_ref(), request).await
    }

    pub async fn generate_key_points(&self, article_id: &str) -> Result<Insights> {
        let request = ApiRequest::post(format!("{}/key_points", insights_path(article_id)));
        call(self.transport.as_ref(), request).await
    }

    /// Refreshes basic insights for up to `limit` articles (backend default 100).
    pub async fn batch_refresh_basic(&self, limit: u32) -> Result<BatchResult> {
        let request = ApiRequest::post("/wx/insights/batch/basic").query("limit", limit);
        call(self.transport.as_ref(), request).await
    }

    /// Schedules cache fills for up to `limit` articles (backend default 50).
    pub async fn batch_cache(&self, limit: u32) -> Result<BatchResult> {
        let request = ApiRequest::post("/wx/insights/batch/cache").query("limit", limit);
        call(self.transport.as_ref(), request).await
    }
}
