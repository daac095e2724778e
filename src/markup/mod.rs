//! Article markup rewriting.
//!
//! Article bodies come from WeChat and are embedded in the reader's own page,
//! so every `<img>` is normalized before rendering:
//!
//! 1. **Upgrade**: protocol-relative `src`/`data-src` values (`//host/..`) get `https:`.
//! 2. **Promote**: a lazy `data-src` replaces a missing or placeholder `src`
//!    (`data:`, `blob:`, `about:blank`, empty). A usable `src` is kept.
//! 3. **Proxy**: absolute external `src`/`data-src` values are routed through
//!    the [`ResourceProxy`] as `<base><original-url>`.
//! 4. **Strip**: `width` attributes are removed.
//! 5. **Inject**: `referrerpolicy="no-referrer"` is added as the first
//!    attribute unless the tag already declares a policy.
//!
//! Passes run in this order on each tag. Running the whole pipeline on its own
//! output changes nothing, so cached articles can be rewritten again safely.
//! Tags are parsed leniently, so malformed attribute lists still get every
//! pass that applies; rewriting never fails.
//!
//! ## Usage
//!
//! ```rust
//! use wechat_reader_rs::{MarkupRewriter, ResourceProxy};
//!
//! let rewriter = MarkupRewriter::new(ResourceProxy::default());
//! let html = rewriter.rewrite(r#"<p><img data-src="//mmbiz.qpic.cn/a.jpg" width="640"></p>"#);
//! assert_eq!(
//!     html,
//!     r#"<p><img referrerpolicy="no-referrer" src="/static/res/logo/https://mmbiz.qpic.cn/a.jpg"></p>"#
//! );
//! ```

mod classify;
mod tag;

pub use classify::UrlKind;

use crate::config::Config;
use crate::resource::ResourceProxy;
use regex::Captures;
use std::borrow::Cow;
use tag::{IMG_TAG, ImgTag};
use tracing::debug;

const SRC: &str = "src";
const DATA_SRC: &str = "data-src";
const WIDTH: &str = "width";
const REFERRER_POLICY: &str = "referrerpolicy";
const NO_REFERRER: &str = "no-referrer";

/// One step of the rewrite pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewritePass {
    UpgradeProtocolRelative,
    PromoteLazySource,
    ProxyExternal,
    StripWidth,
    InjectReferrerPolicy,
}

impl RewritePass {
    /// Pipeline order. Proxying must follow promotion so promoted URLs are proxied too.
    pub const ORDERED: [RewritePass; 5] = [
        RewritePass::UpgradeProtocolRelative,
        RewritePass::PromoteLazySource,
        RewritePass::ProxyExternal,
        RewritePass::StripWidth,
        RewritePass::InjectReferrerPolicy,
    ];

    fn apply(self, tag: &mut ImgTag<'_>, proxy: &ResourceProxy) {
        match self {
            RewritePass::UpgradeProtocolRelative => upgrade_protocol_relative(tag),
            RewritePass::PromoteLazySource => promote_lazy_source(tag),
            RewritePass::ProxyExternal => proxy_external(tag, proxy),
            RewritePass::StripWidth => {
                tag.remove_all(WIDTH);
            }
            RewritePass::InjectReferrerPolicy => {
                if tag.position(REFERRER_POLICY).is_none() {
                    tag.insert_first(REFERRER_POLICY, NO_REFERRER);
                }
            }
        }
    }
}

/// Rewrites article HTML for embedding in the viewer.
#[derive(Debug, Clone, Default)]
pub struct MarkupRewriter {
    proxy: ResourceProxy,
}

impl MarkupRewriter {
    pub fn new(proxy: ResourceProxy) -> Self {
        Self { proxy }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ResourceProxy::from_config(config))
    }

    pub fn proxy(&self) -> &ResourceProxy {
        &self.proxy
    }

    /// Runs the full pipeline. Empty input and markup without `<img>` tags are
    /// returned borrowed and unchanged.
    pub fn rewrite<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.run(content, &RewritePass::ORDERED)
    }

    /// Like [`rewrite`](Self::rewrite); absent content stays absent.
    pub fn rewrite_optional<'a>(&self, content: Option<&'a str>) -> Option<Cow<'a, str>> {
        content.map(|c| self.rewrite(c))
    }

    /// Runs a single pass over every `<img>` tag.
    pub fn apply_pass<'a>(&self, pass: RewritePass, content: &'a str) -> Cow<'a, str> {
        self.run(content, &[pass])
    }

    fn run<'a>(&self, content: &'a str, passes: &[RewritePass]) -> Cow<'a, str> {
        if content.is_empty() {
            return Cow::Borrowed(content);
        }

        let mut seen = 0usize;
        let mut changed = 0usize;
        let rewritten = IMG_TAG.replace_all(content, |caps: &Captures<'_>| {
            seen += 1;
            let source = &caps[0];
            match self.rewrite_tag(source, passes) {
                Some(tag) => {
                    changed += 1;
                    tag
                }
                None => source.to_string(),
            }
        });

        if seen > 0 {
            debug!("Rewrote {changed} of {seen} image tags");
        }
        rewritten
    }

    /// Returns the new tag text, or `None` when no pass changed anything.
    fn rewrite_tag(&self, source: &str, passes: &[RewritePass]) -> Option<String> {
        let mut tag = ImgTag::parse(source)?;
        for pass in passes {
            pass.apply(&mut tag, &self.proxy);
        }
        tag.is_modified().then(|| tag.render())
    }
}

fn is_source(tag: &ImgTag<'_>, index: usize) -> bool {
    tag.attribute(index)
        .is_some_and(|a| a.is(SRC) || a.is(DATA_SRC))
}

fn upgrade_protocol_relative(tag: &mut ImgTag<'_>) {
    for i in 0..tag.len() {
        if !is_source(tag, i) {
            continue;
        }
        let Some(value) = tag.value_at(i).map(str::trim) else {
            continue;
        };
        if UrlKind::classify(value) == UrlKind::ProtocolRelative {
            let upgraded = format!("https:{value}");
            tag.set_value(i, upgraded);
        }
    }
}

fn promote_lazy_source(tag: &mut ImgTag<'_>) {
    let Some(lazy_index) = tag.position(DATA_SRC) else {
        return;
    };
    let lazy = match tag.value_at(lazy_index).map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => return,
    };

    match tag.position(SRC) {
        Some(src_index) => {
            let current = tag.get(SRC).unwrap_or("");
            if UrlKind::classify(current).is_placeholder() {
                tag.set_value(src_index, lazy);
            }
        }
        None => {
            tag.rename(lazy_index, SRC);
            tag.set_value(lazy_index, lazy);
        }
    }
}

fn proxy_external(tag: &mut ImgTag<'_>, proxy: &ResourceProxy) {
    for i in 0..tag.len() {
        if !is_source(tag, i) {
            continue;
        }
        let Some(value) = tag.value_at(i).map(str::trim) else {
            continue;
        };
        if UrlKind::classify(value) == UrlKind::AbsoluteExternal && !proxy.is_proxied(value) {
            let proxied = proxy.proxied(value);
            tag.set_value(i, proxied);
        }
    }
}
