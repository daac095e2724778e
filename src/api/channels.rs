//! Subscribed channel feeds, reading state, backfill and article navigation.

use super::insights::{Insights, insights_path};
use super::public::{ArticleDetail, article_path};
use super::call;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use crate::utils::encode_path_segment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Ordering for the feed list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Most recently published first.
    #[default]
    Recent,
    Name,
    Created,
}

impl FeedSort {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedSort::Recent => "recent",
            FeedSort::Name => "name",
            FeedSort::Created => "created",
        }
    }
}

/// Parameters for [`ChannelsApi::get_channel_feeds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub kw: String,
    pub limit: u32,
    pub offset: u32,
    pub sort: FeedSort,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            kw: String::new(),
            limit: 200,
            offset: 0,
            sort: FeedSort::Recent,
        }
    }
}

/// Parameters for [`ChannelsApi::get_channel_articles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub mp_id: Option<String>,
    /// Sent comma-joined; omitted when empty.
    pub mp_ids: Vec<String>,
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub unread_only: bool,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            mp_id: None,
            mp_ids: Vec::new(),
            search: None,
            limit: 30,
            offset: 0,
            unread_only: false,
        }
    }
}

impl ArticleQuery {
    pub fn channel(mp_id: impl Into<String>) -> Self {
        Self {
            mp_id: Some(mp_id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFeedItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default)]
    pub article_count: u64,
    /// Unix seconds of the newest article, 0 when the feed is empty.
    #[serde(default)]
    pub latest_publish_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedStats {
    #[serde(default)]
    pub unread_total: u64,
    #[serde(default)]
    pub article_total: u64,
    #[serde(default)]
    pub feed_total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFeedsResult {
    #[serde(default)]
    pub list: Vec<ChannelFeedItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub stats: FeedStats,
    #[serde(default)]
    pub page: Option<PageInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadAllResult {
    #[serde(default)]
    pub updated: u64,
}

/// Article rows are passed through as the backend returns them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleList {
    #[serde(default)]
    pub list: Vec<Value>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackfillArticleResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub matched_by: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub scanned_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackfillMpResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub mp_id: String,
    #[serde(default)]
    pub max_pages: u32,
    #[serde(default)]
    pub only_missing: bool,
    #[serde(default)]
    pub scanned_items: u64,
    #[serde(default)]
    pub matched_existing: u64,
    #[serde(default)]
    pub updated: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFetchResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub fetched: bool,
    #[serde(default)]
    pub changed: Option<bool>,
    #[serde(default)]
    pub content_len: u64,
    #[serde(default)]
    pub desc_len: u64,
    #[serde(default)]
    pub pic_url: Option<String>,
    #[serde(default)]
    pub summary_len: Option<u64>,
}

/// Channel endpoints for a logged-in reader.
#[derive(Clone)]
pub struct ChannelsApi {
    transport: Arc<dyn Transport>,
}

impl ChannelsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_channel_feeds(&self, query: &FeedQuery) -> Result<ChannelFeedsResult> {
        let request = ApiRequest::get("/wx/channels/feeds")
            .query("kw", &query.kw)
            .query("limit", query.limit)
            .query("offset", query.offset)
            .query("sort", query.sort.as_str());
        call(self.transport.as_ref(), request).await
    }

    /// Marks every article read, optionally within one channel.
    pub async fn mark_all_read(&self, mp_id: Option<&str>, kw: &str) -> Result<ReadAllResult> {
        let request = ApiRequest::post("/wx/channels/read_all")
            .query_opt("mp_id", mp_id)
            .query("kw", kw);
        call(self.transport.as_ref(), request).await
    }

    /// Marks every article read across several channels.
    pub async fn mark_all_read_multi<S: AsRef<str>>(
        &self,
        mp_ids: &[S],
        kw: &str,
    ) -> Result<ReadAllResult> {
        let request = ApiRequest::post("/wx/channels/read_all")
            .query("mp_ids", join_ids(mp_ids))
            .query("kw", kw);
        call(self.transport.as_ref(), request).await
    }

    pub async fn set_article_read(&self, article_id: &str, is_read: bool) -> Result<Value> {
        let request =
            ApiRequest::put(format!("{}/read", article_path(article_id))).query("is_read", is_read);
        call(self.transport.as_ref(), request).await
    }

    pub async fn get_channel_articles(&self, query: &ArticleQuery) -> Result<ArticleList> {
        let mp_ids = (!query.mp_ids.is_empty()).then(|| join_ids(&query.mp_ids));
        let request = ApiRequest::get("/wx/articles")
            .query_opt("mp_id", query.mp_id.as_deref())
            .query_opt("mp_ids", mp_ids)
            .query_opt("search", query.search.as_deref())
            .query("limit", query.limit)
            .query("offset", query.offset)
            .query("unread_only", query.unread_only);
        call(self.transport.as_ref(), request).await
    }

    /// Looks the article up in its channel's history to recover a missing description.
    pub async fn backfill_article(
        &self,
        article_id: &str,
        max_pages: u32,
    ) -> Result<BackfillArticleResult> {
        let path = format!(
            "/wx/channels/articles/{}/backfill",
            encode_path_segment(article_id)
        );
        let request = ApiRequest::post(path).query("max_pages", max_pages);
        call(self.transport.as_ref(), request).await
    }

    pub async fn backfill_mp(
        &self,
        mp_id: &str,
        max_pages: u32,
        only_missing: bool,
    ) -> Result<BackfillMpResult> {
        let path = format!("/wx/channels/mps/{}/backfill", encode_path_segment(mp_id));
        let request = ApiRequest::post(path)
            .query("max_pages", max_pages)
            .query("only_missing", only_missing);
        call(self.transport.as_ref(), request).await
    }

    pub async fn fetch_article_content(
        &self,
        article_id: &str,
        force: bool,
    ) -> Result<ContentFetchResult> {
        let request = ApiRequest::post(format!("{}/content/fetch", article_path(article_id)))
            .query("force", force);
        call(self.transport.as_ref(), request).await
    }

    pub async fn get_authed_insights(&self, article_id: &str, include_llm: bool) -> Result<Insights> {
        let request = ApiRequest::get(insights_path(article_id)).query("include_llm", include_llm);
        call(self.transport.as_ref(), request).await
    }

    pub async fn get_next_article(&self, article_id: &str) -> Result<ArticleDetail> {
        let request = ApiRequest::get(format!("{}/next", article_path(article_id)));
        call(self.transport.as_ref(), request).await
    }

    pub async fn get_prev_article(&self, article_id: &str) -> Result<ArticleDetail> {
        let request = ApiRequest::get(format!("{}/prev", article_path(article_id)));
        call(self.transport.as_ref(), request).await
    }
}

fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReaderError;
    use crate::http::Method;
    use crate::traits::mock::RecordingTransport;
    use serde_json::json;

    fn api_with(data: Value) -> (Arc<RecordingTransport>, ChannelsApi) {
        let transport = Arc::new(RecordingTransport::with_response(data));
        let api = ChannelsApi::new(transport.clone());
        (transport, api)
    }

    #[tokio::test]
    async fn test_get_channel_feeds_defaults() {
        let (transport, api) = api_with(json!({
            "list": [{
                "id": "MP_WXS_1", "name": "频道", "cover": "", "intro": "",
                "created_at": "2025-01-01T00:00:00", "unread_count": 3,
                "article_count": 10, "latest_publish_time": 1700000000
            }],
            "total": 1,
            "stats": {"unread_total": 3, "article_total": 10, "feed_total": 1},
            "page": {"limit": 200, "offset": 0, "total": 1}
        }));

        let feeds = api.get_channel_feeds(&FeedQuery::default()).await.unwrap();
        assert_eq!(feeds.list[0].unread_count, 3);
        assert_eq!(feeds.stats.article_total, 10);
        assert_eq!(feeds.page.unwrap().limit, 200);

        let request = transport.last_request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/wx/channels/feeds");
        assert_eq!(
            request.query,
            vec![
                ("kw".to_string(), String::new()),
                ("limit".to_string(), "200".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("sort".to_string(), "recent".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let (transport, api) = api_with(json!({"updated": 4}));
        let result = api.mark_all_read(None, "").await.unwrap();
        assert_eq!(result.updated, 4);

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/wx/channels/read_all");
        assert_eq!(request.query_value("mp_id"), None);
        assert_eq!(request.query_value("kw"), Some(""));

        transport.push(Ok(json!({"updated": 2})));
        api.mark_all_read_multi(&["a", "b", "c"], "k").await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.query_value("mp_ids"), Some("a,b,c"));
        assert_eq!(request.query_value("kw"), Some("k"));
    }

    #[tokio::test]
    async fn test_set_article_read() {
        let (transport, api) = api_with(Value::Null);
        api.set_article_read("a 1", true).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/wx/articles/a%201/read");
        assert_eq!(request.query_value("is_read"), Some("true"));
    }

    #[tokio::test]
    async fn test_get_channel_articles_omits_absent_params() {
        let (transport, api) = api_with(json!({"list": [{"id": "a1"}], "total": 1}));

        let list = api
            .get_channel_articles(&ArticleQuery::default())
            .await
            .unwrap();
        assert_eq!(list.total, 1);

        let request = transport.last_request();
        assert_eq!(request.path, "/wx/articles");
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "30".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("unread_only".to_string(), "false".to_string()),
            ]
        );

        transport.push(Ok(json!({"list": [], "total": 0})));
        let query = ArticleQuery {
            mp_ids: vec!["x".into(), "y".into()],
            search: Some("rust".into()),
            unread_only: true,
            ..ArticleQuery::channel("MP_WXS_1")
        };
        api.get_channel_articles(&query).await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.query_value("mp_id"), Some("MP_WXS_1"));
        assert_eq!(request.query_value("mp_ids"), Some("x,y"));
        assert_eq!(request.query_value("search"), Some("rust"));
        assert_eq!(request.query_value("unread_only"), Some("true"));
    }

    #[tokio::test]
    async fn test_backfill() {
        let (transport, api) = api_with(json!({
            "ok": true, "updated": true, "page": 3, "matched_by": "url"
        }));
        let result = api.backfill_article("a1", 25).await.unwrap();
        assert!(result.updated);
        assert_eq!(result.matched_by.as_deref(), Some("url"));
        let request = transport.last_request();
        assert_eq!(request.path, "/wx/channels/articles/a1/backfill");
        assert_eq!(request.query_value("max_pages"), Some("25"));

        transport.push(Ok(json!({
            "ok": true, "mp_id": "MP_WXS_1", "max_pages": 20, "only_missing": true,
            "scanned_items": 100, "matched_existing": 40, "updated": 12
        })));
        let result = api.backfill_mp("MP_WXS_1", 20, true).await.unwrap();
        assert_eq!(result.updated, 12);
        let request = transport.last_request();
        assert_eq!(request.path, "/wx/channels/mps/MP_WXS_1/backfill");
        assert_eq!(request.query_value("only_missing"), Some("true"));
    }

    #[tokio::test]
    async fn test_fetch_article_content() {
        let (transport, api) = api_with(json!({
            "ok": true, "fetched": true, "changed": true, "content_len": 5120, "desc_len": 80
        }));
        let result = api.fetch_article_content("a1", false).await.unwrap();
        assert_eq!(result.content_len, 5120);
        assert!(result.pic_url.is_none());

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/wx/articles/a1/content/fetch");
        assert_eq!(request.query_value("force"), Some("false"));
    }

    #[tokio::test]
    async fn test_navigation_and_insights() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push(Ok(json!({"id": "a2", "title": "next"})));
        transport.push(Ok(json!({"id": "a0", "title": "prev"})));
        transport.push(Ok(json!({"article_id": "a1", "status": 2})));
        let api = ChannelsApi::new(transport.clone());

        assert_eq!(api.get_next_article("a1").await.unwrap().id, "a2");
        assert_eq!(api.get_prev_article("a1").await.unwrap().id, "a0");
        api.get_authed_insights("a1", false).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/wx/articles/a1/next");
        assert_eq!(requests[1].path, "/wx/articles/a1/prev");
        assert_eq!(requests[2].path, "/wx/insights/a1");
        assert_eq!(requests[2].query_value("include_llm"), Some("false"));
    }

    #[tokio::test]
    async fn test_api_error_is_propagated() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push(Err(ReaderError::from_api_response(40401, "文章不存在")));
        let api = ChannelsApi::new(transport);

        let err = api.get_next_article("missing").await.unwrap_err();
        assert!(matches!(err, ReaderError::Api { code: 40401, .. }));
    }
}
