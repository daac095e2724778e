//! The article library: articles joined with their feed, insights,
//! favorite flag and the reader's notes.

use super::insights::Insights;
use super::notes::Note;
use super::{ListResult, call};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use crate::utils::encode_path_segment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Parameters for [`LibraryApi::list_library_articles`]. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub mp_id: Option<String>,
    pub search: Option<String>,
    pub include_content: Option<bool>,
    pub include_insights: Option<bool>,
    pub only_favorited: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryFeed {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
}

/// A library article. Article columns other than the joined data stay in `article`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryArticle {
    #[serde(default)]
    pub feed: Option<LibraryFeed>,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub insights: Option<Insights>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(flatten)]
    pub article: Map<String, Value>,
}

impl LibraryArticle {
    pub fn id(&self) -> Option<&str> {
        self.article.get("id").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.article.get("title").and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.article.get("content").and_then(Value::as_str)
    }
}

#[derive(Clone)]
pub struct LibraryApi {
    transport: Arc<dyn Transport>,
}

impl LibraryApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Returns `None` when the article does not exist.
    pub async fn get_library_article(&self, article_id: &str) -> Result<Option<LibraryArticle>> {
        let path = format!("/wx/library/articles/{}", encode_path_segment(article_id));
        call(self.transport.as_ref(), ApiRequest::get(path)).await
    }

    pub async fn list_library_articles(&self, query: &LibraryQuery) -> Result<ListResult<Value>> {
        let request = ApiRequest::get("/wx/library/articles")
            .query_opt("offset", query.offset)
            .query_opt("limit", query.limit)
            .query_opt("mp_id", query.mp_id.as_deref())
            .query_opt("search", query.search.as_deref())
            .query_opt("include_content", query.include_content)
            .query_opt("include_insights", query.include_insights)
            .query_opt("only_favorited", query.only_favorited);
        call(self.transport.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_library_article() {
        let transport = Arc::new(RecordingTransport::with_response(json!({
            "id": "a1",
            "title": "标题",
            "content": "<p>x</p>",
            "feed": {"id": "MP_WXS_1", "name": "频道", "cover": null, "intro": null},
            "favorited": true,
            "insights": {"summary": "s", "headings": [], "llm_breakdown": null, "status": 1, "error": ""},
            "notes": [{"id": 7, "user_id": "u1", "article_id": "a1", "content": "n"}]
        })));
        let api = LibraryApi::new(transport.clone());

        let article = api.get_library_article("a1").await.unwrap().unwrap();
        assert_eq!(article.id(), Some("a1"));
        assert_eq!(article.title(), Some("标题"));
        assert_eq!(article.content(), Some("<p>x</p>"));
        assert!(article.favorited);
        assert_eq!(article.feed.unwrap().name.as_deref(), Some("频道"));
        assert_eq!(article.insights.unwrap().summary, "s");
        assert_eq!(article.notes[0].id, 7);
        assert_eq!(transport.last_request().path, "/wx/library/articles/a1");
    }

    #[tokio::test]
    async fn test_missing_library_article() {
        let transport = Arc::new(RecordingTransport::with_response(Value::Null));
        let api = LibraryApi::new(transport);

        assert!(api.get_library_article("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_library_articles() {
        let transport = Arc::new(RecordingTransport::with_response(json!({"list": [], "total": 0})));
        let api = LibraryApi::new(transport.clone());

        let query = LibraryQuery {
            limit: Some(10),
            only_favorited: Some(true),
            ..LibraryQuery::default()
        };
        assert!(api.list_library_articles(&query).await.unwrap().is_empty());

        let request = transport.last_request();
        assert_eq!(request.path, "/wx/library/articles");
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("only_favorited".to_string(), "true".to_string()),
            ]
        );
    }
}
