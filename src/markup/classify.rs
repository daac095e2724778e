//! Classification of image source values.

use crate::utils::{is_external_url, starts_with_ignore_case};

/// How an image `src`/`data-src` value is treated by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// `//host/path`, inherits the page scheme
    ProtocolRelative,
    /// `http://` or `https://`
    AbsoluteExternal,
    /// Renders nothing: empty, `data:`, `blob:` or `about:blank`
    Placeholder,
    /// Relative or already proxied
    Other,
}

impl UrlKind {
    /// Classifies a raw attribute value. Surrounding whitespace is ignored.
    pub fn classify(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            UrlKind::Placeholder
        } else if value.starts_with("//") {
            UrlKind::ProtocolRelative
        } else if is_external_url(value) {
            UrlKind::AbsoluteExternal
        } else if starts_with_ignore_case(value, "data:")
            || starts_with_ignore_case(value, "blob:")
            || value == "about:blank"
        {
            UrlKind::Placeholder
        } else {
            UrlKind::Other
        }
    }

    pub fn is_placeholder(self) -> bool {
        self == UrlKind::Placeholder
    }
}
