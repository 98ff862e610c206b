//! Markdown subset parser with an HTML renderer.
//!
//! The supported syntax is deliberately small:
//!
//! - `#` headings of any depth
//! - paragraphs separated by blank lines, with soft line breaks
//! - `**strong**`, `*em*`, `~~del~~`, `` `code` `` and `[text](href)`
//!
//! Conversion happens in two passes. [`parse`] builds a tree of [`Token`]s and
//! [`HtmlRenderer`] turns that tree into HTML. Malformed markup never fails:
//! unclosed constructs are kept as literal text.
//!
//! # Example
//!
//! ```
//! let html = mrkdwn::to_html("# Title\n\nSee [docs](https://example.com).\n");
//! assert_eq!(
//!     html,
//!     "<h1>Title</h1>\n\n<p>See <a href=\"https://example.com\">docs</a>.</p>\n"
//! );
//! ```

mod cursor;
mod parser;
mod renderer;
mod token;

use std::io;

pub use parser::{Parser, parse, parse_inline};
pub use renderer::{HtmlRenderer, RenderError, RenderOptions, escape_html};
pub use token::Token;

/// Render tokens to HTML with default options.
#[must_use]
pub fn render(tokens: &[Token]) -> String {
    HtmlRenderer::new().render(tokens)
}

/// Convert markdown to HTML with default options.
#[must_use]
pub fn to_html(markdown: &str) -> String {
    render(&parse(markdown))
}

/// Convert markdown to HTML, writing the result into `writer`.
pub fn write_html<W: io::Write>(markdown: &str, writer: W) -> Result<(), RenderError> {
    HtmlRenderer::new().write_to(&parse(markdown), writer)
}
