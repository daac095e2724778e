//! Favorite flags on articles.

use super::{ListResult, call};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use crate::utils::encode_path_segment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteState {
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub favorited: bool,
}

/// Per-user favorites.
#[derive(Clone)]
pub struct FavoritesApi {
    transport: Arc<dyn Transport>,
}

impl FavoritesApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Favorites an article. Favoriting twice is not an error.
    pub async fn favorite_article(&self, article_id: &str) -> Result<FavoriteState> {
        call(self.transport.as_ref(), ApiRequest::post(favorite_path(article_id))).await
    }

    pub async fn unfavorite_article(&self, article_id: &str) -> Result<FavoriteState> {
        call(self.transport.as_ref(), ApiRequest::delete(favorite_path(article_id))).await
    }

    pub async fn list_favorites(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<ListResult<Value>> {
        let request = ApiRequest::get("/wx/favorites")
            .query_opt("offset", offset)
            .query_opt("limit", limit);
        call(self.transport.as_ref(), request).await
    }
}

fn favorite_path(article_id: &str) -> String {
    format!("/wx/favorites/{}", encode_path_segment(article_id))
}
