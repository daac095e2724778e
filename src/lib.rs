//! # WeChat Reader Rust SDK
//!
//! Client layer for a self-hosted WeChat article reader: typed access to the
//! reader backend and the rewriting that makes fetched article HTML safe to
//! embed.
//!
//! ## Features
//!
//! - **Markup rewriting**: lazy-loaded images are promoted, protocol-relative
//!   and external images are routed through the resource proxy, fixed widths
//!   are dropped and `referrerpolicy="no-referrer"` is added
//! - **Typed API**: channels, favorites, insights, library, notes and public endpoints
//! - **Pluggable transport**: swap the HTTP client for anything implementing [`Transport`]
//!
//! ## Quick Start
//!
//! ```rust
//! use wechat_reader_rs::MarkupRewriter;
//!
//! let rewriter = MarkupRewriter::default();
//! let html = rewriter.rewrite(r#"<img src="http://x.com/a.png" width="200">"#);
//! assert_eq!(
//!     html,
//!     r#"<img referrerpolicy="no-referrer" src="/static/res/logo/http://x.com/a.png">"#
//! );
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod markup;
pub mod resource;
pub mod traits;
pub mod utils;

// Re-export main types for convenience
pub use client::ReaderClient;
pub use config::Config;
pub use error::{ReaderError, Result};
pub use markup::{MarkupRewriter, RewritePass, UrlKind};
pub use resource::ResourceProxy;
pub use traits::Transport;
