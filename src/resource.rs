//! Resource proxy addressing.
//!
//! The backend relays third-party images under a fixed path prefix: a request
//! for `<base><original-absolute-url>` returns the bytes fetched from the
//! original URL. [`ResourceProxy`] carries that prefix and is shared by the
//! avatar resolver and the markup rewriter.

use crate::config::{Config, DEFAULT_RES_BASE_URL};
use std::borrow::Cow;

/// Builds proxy paths for external resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProxy {
    base: String,
}

impl ResourceProxy {
    /// Creates a proxy rooted at `base`. The original URL is appended verbatim,
    /// so the base normally ends with `/`.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Creates a proxy from the resource section of a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.resources.res_base_url.clone())
    }

    /// The configured base path.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the proxy path for `url`. No encoding is applied.
    pub fn proxied(&self, url: &str) -> String {
        format!("{}{}", self.base, url)
    }

    /// Checks whether `url` already points at this proxy.
    pub fn is_proxied(&self, url: &str) -> bool {
        url.starts_with(&self.base)
    }

    /// Resolves an avatar or logo source.
    ///
    /// URLs starting with lowercase `http://` or `https://` are mapped through
    /// the proxy. Anything else, including `HTTPS://` and empty strings, is
    /// returned unchanged.
    ///
    /// ```rust
    /// use wechat_reader_rs::ResourceProxy;
    ///
    /// let proxy = ResourceProxy::default();
    /// assert_eq!(
    ///     proxy.resolve_avatar_url("https://x.com/logo.png"),
    ///     "/static/res/logo/https://x.com/logo.png"
    /// );
    /// assert_eq!(proxy.resolve_avatar_url("/local/logo.png"), "/local/logo.png");
    /// ```
    pub fn resolve_avatar_url<'a>(&self, url: &'a str) -> Cow<'a, str> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Cow::Owned(self.proxied(url))
        } else {
            Cow::Borrowed(url)
        }
    }

    /// [`resolve_avatar_url`](Self::resolve_avatar_url) for optional sources; `None` passes through.
    pub fn resolve_avatar_url_opt<'a>(&self, url: Option<&'a str>) -> Option<Cow<'a, str>> {
        url.map(|u| self.resolve_avatar_url(u))
    }
}

impl Default for ResourceProxy {
    fn default() -> Self {
        Self::new(DEFAULT_RES_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_avatar_is_proxied() {
        let proxy = ResourceProxy::default();
        assert_eq!(
            proxy.resolve_avatar_url("https://x.com/logo.png"),
            "/static/res/logo/https://x.com/logo.png"
        );
        assert_eq!(
            proxy.resolve_avatar_url("http://mmbiz.qpic.cn/head/0"),
            "/static/res/logo/http://mmbiz.qpic.cn/head/0"
        );
    }

    #[test]
    fn test_local_avatar_passes_through() {
        let proxy = ResourceProxy::default();
        assert!(matches!(
            proxy.resolve_avatar_url("/local/logo.png"),
            Cow::Borrowed("/local/logo.png")
        ));
        assert_eq!(proxy.resolve_avatar_url(""), "");
        assert_eq!(proxy.resolve_avatar_url("//cdn.example.com/a.png"), "//cdn.example.com/a.png");
        assert_eq!(proxy.resolve_avatar_url_opt(None), None);
    }

    #[test]
    fn test_avatar_scheme_is_case_sensitive() {
        let proxy = ResourceProxy::default();
        assert_eq!(
            proxy.resolve_avatar_url("HTTPS://X.COM/logo.png"),
            "HTTPS://X.COM/logo.png"
        );
        assert_eq!(proxy.resolve_avatar_url("Http://x.com/a.png"), "Http://x.com/a.png");
    }

    #[test]
    fn test_custom_base_from_config() {
        let mut config = Config::default();
        config.resources.res_base_url = "/img-proxy/".to_string();
        let proxy = ResourceProxy::from_config(&config);

        assert_eq!(proxy.base(), "/img-proxy/");
        assert_eq!(
            proxy.resolve_avatar_url("https://x.com/a.png"),
            "/img-proxy/https://x.com/a.png"
        );
        assert!(proxy.is_proxied("/img-proxy/https://x.com/a.png"));
        assert!(!proxy.is_proxied("https://x.com/a.png"));
    }
}
