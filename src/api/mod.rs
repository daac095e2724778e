//! Typed wrappers over the reader backend endpoints, grouped by area.
//!
//! Every wrapper builds one [`ApiRequest`] and hands it to a shared
//! [`Transport`]. Query parameters without a value are left out and ids in
//! paths are percent-encoded.

pub mod channels;
pub mod favorites;
pub mod insights;
pub mod library;
pub mod notes;
pub mod public;

pub use channels::{
    ArticleList, ArticleQuery, BackfillArticleResult, BackfillMpResult, ChannelFeedItem,
    ChannelFeedsResult, ChannelsApi, ContentFetchResult, FeedQuery, FeedSort, FeedStats, PageInfo,
    ReadAllResult,
};
pub use favorites::{FavoriteState, FavoritesApi};
pub use insights::{BatchResult, Heading, InsightStatus, Insights, InsightsApi, KeyPoints};
pub use library::{LibraryApi, LibraryArticle, LibraryFeed, LibraryQuery};
pub use notes::{Note, NoteDeleted, NoteRewrite, NotesApi};
pub use public::{ArticleDetail, PublicApi, PublicArticleItem, PublicChannel, PublicChannelArticles};

use crate::error::Result;
use crate::http::ApiRequest;
use crate::traits::Transport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A page of items with the backend's total count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

impl<T> ListResult<T> {
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Reads `null` as the default value. Nullable backend columns use this so
/// they can stay plain strings.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Executes `request` and decodes the unwrapped payload.
pub(crate) async fn call<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> Result<T> {
    let data = transport.execute(request).await?;
    Ok(serde_json::from_value(data)?)
}
