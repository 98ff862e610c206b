//! HTML renderer for parsed token trees.
//!
//! Each top-level token renders to one fragment terminated by a newline, and
//! fragments are separated by an empty line:
//!
//! ```text
//! <h1>Title</h1>
//!
//! <p>Body</p>
//! ```
//!
//! The parser trims the whitespace around literal text, so inline siblings
//! are always separated by a single space, except next to a soft line break,
//! before text starting with closing punctuation (`. , ; : ! ? ' ) ] }`) and
//! after text ending with an opening bracket. Markup written without
//! surrounding spaces, such as ``foo`bar`baz``, therefore renders with spaces.

use std::io;

use crate::token::Token;

/// Characters that attach to the preceding token without a space.
const CLOSING_PUNCTUATION: [char; 10] = ['.', ',', ';', ':', '!', '?', '\'', ')', ']', '}'];

/// Characters that attach to the following token without a space.
const OPENING_PUNCTUATION: [char; 3] = ['(', '[', '{'];

/// Error returned when rendered HTML cannot be written out.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// I/O error writing to the destination.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Options for [`HtmlRenderer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RenderOptions {
    /// Entity-encode literal text and link targets.
    ///
    /// Default: `false` (text is emitted verbatim).
    pub escape_html: bool,
}

impl RenderOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable entity encoding of text and link targets.
    #[must_use]
    pub fn with_escape_html(mut self, enabled: bool) -> Self {
        self.escape_html = enabled;
        self
    }
}

/// Renders token trees to HTML.
///
/// # Example
///
/// ```
/// use mrkdwn::{HtmlRenderer, Token};
///
/// let tokens = vec![Token::Em { children: vec![Token::raw("emphasised text")] }];
/// assert_eq!(HtmlRenderer::new().render(&tokens), "<em>emphasised text</em>\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with the given options.
    #[must_use]
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options this renderer was created with.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render a token sequence to an HTML string.
    #[must_use]
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut out = String::new();

        for (index, token) in tokens.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            self.render_token(token, &mut out);
            out.push('\n');
        }

        tracing::debug!(tokens = tokens.len(), bytes = out.len(), "Rendered HTML");
        out
    }

    /// Render a token sequence into `writer`.
    pub fn write_to<W: io::Write>(
        &self,
        tokens: &[Token],
        mut writer: W,
    ) -> Result<(), RenderError> {
        writer.write_all(self.render(tokens).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn render_token(&self, token: &Token, out: &mut String) {
        match token {
            Token::Heading { depth, children } => {
                let tag = format!("h{depth}");
                self.render_element(&tag, children, out);
            }
            Token::Text { children } => self.render_element("p", children, out),
            Token::RawText { text } => self.push_text(text, out),
            Token::NewLine => out.push('\n'),
            Token::Strong { children } => self.render_element("strong", children, out),
            Token::Em { children } => self.render_element("em", children, out),
            Token::Del { children } => self.render_element("del", children, out),
            Token::Code { children } => self.render_element("code", children, out),
            Token::Link { href, children } => {
                out.push_str(r#"<a href=""#);
                self.push_text(href, out);
                out.push_str(r#"">"#);
                self.render_inline(children, out);
                out.push_str("</a>");
            }
        }
    }

    fn render_element(&self, tag: &str, children: &[Token], out: &mut String) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        self.render_inline(children, out);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    /// Render siblings, restoring the single space the parser trimmed
    /// between them.
    fn render_inline(&self, tokens: &[Token], out: &mut String) {
        let mut previous: Option<&Token> = None;

        for token in tokens {
            if previous.is_some_and(|prev| needs_space(prev, token)) {
                out.push(' ');
            }
            self.render_token(token, out);
            previous = Some(token);
        }
    }

    fn push_text(&self, text: &str, out: &mut String) {
        if self.options.escape_html {
            out.push_str(&escape_html(text));
        } else {
            out.push_str(text);
        }
    }
}

fn needs_space(previous: &Token, next: &Token) -> bool {
    match (previous, next) {
        (Token::NewLine, _) | (_, Token::NewLine) => false,
        (_, Token::RawText { text }) if text.starts_with(&CLOSING_PUNCTUATION[..]) => false,
        (Token::RawText { text }, _) if text.ends_with(&OPENING_PUNCTUATION[..]) => false,
        _ => true,
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
