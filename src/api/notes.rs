//! Reader notes on articles, including model-assisted rewrites.

use super::{ListResult, call};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// A reader's note on an article (plain text or Markdown).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDeleted {
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRewrite {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub rewritten: String,
    #[serde(default)]
    pub saved: bool,
}

#[derive(Clone)]
pub struct NotesApi {
    transport: Arc<dyn Transport>,
}

impl NotesApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list_notes(
        &self,
        article_id: Option<&str>,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<ListResult<Note>> {
        let request = ApiRequest::get("/wx/notes")
            .query_opt("article_id", article_id)
            .query_opt("offset", offset)
            .query_opt("limit", limit);
        call(self.transport.as_ref(), request).await
    }

    pub async fn create_note(&self, article_id: &str, content: &str) -> Result<Note> {
        let request = ApiRequest::post("/wx/notes")
            .json(&json!({"article_id": article_id, "content": content}))?;
        call(self.transport.as_ref(), request).await
    }

    pub async fn update_note(&self, note_id: i64, content: &str) -> Result<Note> {
        let request =
            ApiRequest::put(format!("/wx/notes/{note_id}")).json(&json!({"content": content}))?;
        call(self.transport.as_ref(), request).await
    }

    pub async fn delete_note(&self, note_id: i64) -> Result<NoteDeleted> {
        call(self.transport.as_ref(), ApiRequest::delete(format!("/wx/notes/{note_id}"))).await
    }

    /// Polishes a note with the configured model; `save` overwrites the stored note.
    pub async fn rewrite_note(&self, note_id: i64, save: bool) -> Result<NoteRewrite> {
        let request =
            ApiRequest::post(format!("/wx/notes/{note_id}/rewrite")).json(&json!({"save": save}))?;
        call(self.transport.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::traits::mock::RecordingTransport;

    #[tokio::test]
    async fn test_list_notes() {
        let transport = Arc::new(RecordingTransport::with_response(json!({
            "list": [{"id": 1, "user_id": "u", "article_id": "a1", "content": "c",
                      "created_at": "2025-01-01T00:00:00", "updated_at": "2025-01-01T00:00:00"}],
            "total": 1
        })));
        let api = NotesApi::new(transport.clone());

        let notes = api.list_notes(Some("a1"), None, None).await.unwrap();
        assert_eq!(notes.list[0].content, "c");

        let request = transport.last_request();
        assert_eq!(request.path, "/wx/notes");
        assert_eq!(request.query, vec![("article_id".to_string(), "a1".to_string())]);
    }

    #[tokio::test]
    async fn test_note_mutations() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push(Ok(json!({"id": 3, "article_id": "a1", "content": "first"})));
        transport.push(Ok(json!({"id": 3, "article_id": "a1", "content": "second"})));
        transport.push(Ok(json!({"id": 3, "rewritten": "## second", "saved": false})));
        transport.push(Ok(json!({"deleted": true, "id": 3})));
        let api = NotesApi::new(transport.clone());

        assert_eq!(api.create_note("a1", "first").await.unwrap().id, 3);
        assert_eq!(api.update_note(3, "second").await.unwrap().content, "second");
        assert_eq!(api.rewrite_note(3, false).await.unwrap().rewritten, "## second");
        assert!(api.delete_note(3).await.unwrap().deleted);

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/wx/notes");
        assert_eq!(
            requests[0].body,
            Some(json!({"article_id": "a1", "content": "first"}))
        );
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(requests[1].path, "/wx/notes/3");
        assert_eq!(requests[1].body, Some(json!({"content": "second"})));
        assert_eq!(requests[2].path, "/wx/notes/3/rewrite");
        assert_eq!(requests[2].body, Some(json!({"save": false})));
        assert_eq!(requests[3].method, Method::Delete);
        assert_eq!(requests[3].path, "/wx/notes/3");
        assert!(requests[3].body.is_none());
    }
}
