//! Endpoints that need no login: channel listing, channel articles, public
//! insights and article detail.

use super::insights::Insights;
use super::{ListResult, call, null_as_default};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use crate::utils::{encode_path_segment, timestamp_to_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicChannel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub intro: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicArticleItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Unix seconds.
    #[serde(default)]
    pub publish_time: i64,
    #[serde(default)]
    pub mp_id: String,
    #[serde(default)]
    pub mp_name: String,
    #[serde(default)]
    pub pic_url: String,
    #[serde(default)]
    pub is_read: i64,
    #[serde(default)]
    pub word_count: u64,
}

impl PublicArticleItem {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        (self.publish_time > 0)
            .then(|| timestamp_to_datetime(self.publish_time))
            .flatten()
    }

    pub fn is_read(&self) -> bool {
        self.is_read != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicChannelArticles {
    /// Absent when listing across all channels.
    #[serde(default)]
    pub channel: Option<PublicChannel>,
    #[serde(default)]
    pub list: Vec<PublicArticleItem>,
    #[serde(default)]
    pub total: u64,
}

/// Full article record. Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub mp_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pic_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Raw article HTML.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub publish_time: Option<i64>,
    #[serde(default)]
    pub is_read: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub(crate) fn article_path(article_id: &str) -> String {
    format!("/wx/articles/{}", encode_path_segment(article_id))
}

#[derive(Clone)]
pub struct PublicApi {
    transport: Arc<dyn Transport>,
}

impl PublicApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Lists channels. The backend uses limit 200, offset 0 and an empty keyword by default.
    pub async fn get_public_channels(
        &self,
        limit: u32,
        offset: u32,
        kw: &str,
    ) -> Result<ListResult<PublicChannel>> {
        let request = ApiRequest::get("/wx/public/channels")
            .query("limit", limit)
            .query("offset", offset)
            .query("kw", kw);
        call(self.transport.as_ref(), request).await
    }

    /// Articles of one channel, newest first. `channel_id` may be `all`.
    pub async fn get_public_channel_articles(
        &self,
        channel_id: &str,
        limit: u32,
        offset: u32,
        kw: &str,
    ) -> Result<PublicChannelArticles> {
        let path = format!(
            "/wx/public/channels/{}/articles",
            encode_path_segment(channel_id)
        );
        let request = ApiRequest::get(path)
            .query("limit", limit)
            .query("offset", offset)
            .query("kw", kw);
        call(self.transport.as_ref(), request).await
    }

    pub async fn get_public_insights(&self, article_id: &str) -> Result<Insights> {
        let path = format!("/wx/public/insights/{}", encode_path_segment(article_id));
        call(self.transport.as_ref(), ApiRequest::get(path)).await
    }

    pub async fn get_article_detail_public(&self, article_id: &str) -> Result<ArticleDetail> {
        call(self.transport.as_ref(), ApiRequest::get(article_path(article_id))).await
    }
}
