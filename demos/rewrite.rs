//! Rewrites article HTML read from stdin and prints the result.
//!
//! ```sh
//! READER_RES_BASE_URL=/static/res/logo/ RUST_LOG=debug \
//!     cargo run --example rewrite < article.html
//! ```

use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;
use wechat_reader_rs::{Config, MarkupRewriter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let rewriter = MarkupRewriter::from_config(&config);

    let mut html = String::new();
    io::stdin().read_to_string(&mut html)?;

    let output = rewriter.rewrite(&html);
    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}
