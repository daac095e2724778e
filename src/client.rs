//! Main reader client: one entry point for the backend API, the article
//! markup rewriter and avatar resolution.

use crate::api::{
    ChannelsApi, FavoritesApi, InsightsApi, LibraryApi, NotesApi, PublicApi,
};
use crate::config::Config;
use crate::error::Result;
use crate::http::ReaderHttpClient;
use crate::markup::MarkupRewriter;
use crate::resource::ResourceProxy;
use crate::traits::Transport;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// Client for the WeChat reader backend.
///
/// ```rust,no_run
/// use wechat_reader_rs::{Config, ReaderClient, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let client = ReaderClient::new(Config::from_env()?)?;
///     let html = client.article_html("3955981237-2247483782_1").await?;
///     println!("{html}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ReaderClient {
    transport: Arc<dyn Transport>,
    rewriter: MarkupRewriter,
}

impl ReaderClient {
    /// Creates a client backed by [`ReaderHttpClient`].
    pub fn new(config: Config) -> Result<Self> {
        let rewriter = MarkupRewriter::from_config(&config);
        let http = ReaderHttpClient::with_config(config)?;
        Ok(Self {
            transport: Arc::new(http),
            rewriter,
        })
    }

    /// Creates a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, proxy: ResourceProxy) -> Self {
        Self {
            transport,
            rewriter: MarkupRewriter::new(proxy),
        }
    }

    pub fn channels(&self) -> ChannelsApi {
        ChannelsApi::new(self.transport.clone())
    }

    pub fn favorites(&self) -> FavoritesApi {
        FavoritesApi::new(self.transport.clone())
    }

    pub fn insights(&self) -> InsightsApi {
        InsightsApi::new(self.transport.clone())
    }

    pub fn library(&self) -> LibraryApi {
        LibraryApi::new(self.transport.clone())
    }

    pub fn notes(&self) -> NotesApi {
        NotesApi::new(self.transport.clone())
    }

    pub fn public(&self) -> PublicApi {
        PublicApi::new(self.transport.clone())
    }

    pub fn rewriter(&self) -> &MarkupRewriter {
        &self.rewriter
    }

    /// Fetches an article and returns its content ready for embedding.
    ///
    /// Returns an empty string when the article has no content.
    pub async fn article_html(&self, article_id: &str) -> Result<String> {
        let detail = self.public().get_article_detail_public(article_id).await?;
        let Some(content) = detail.content.as_deref() else {
            debug!("Article {article_id} has no content");
            return Ok(String::new());
        };
        Ok(self.rewriter.rewrite(content).into_owned())
    }

    /// Resolves a channel avatar through the resource proxy.
    pub fn avatar_url<'a>(&self, url: &'a str) -> Cow<'a, str> {
        self.rewriter.proxy().resolve_avatar_url(url)
    }
}
