//! Token tree produced by the parser and consumed by the renderer.

/// A node of the parsed document.
///
/// Block-level tokens ([`Token::Heading`], [`Token::Text`]) make up the top
/// level of a parsed document. Everything else is inline content. Children
/// are owned by their parent and never shared.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Token {
    /// Heading; `depth` is the number of leading `#` characters (uncapped).
    Heading { depth: usize, children: Vec<Token> },
    /// Paragraph of inline content.
    Text { children: Vec<Token> },
    /// Literal text without markup.
    RawText { text: String },
    /// Soft line break inside a paragraph.
    NewLine,
    /// `**strong**`
    Strong { children: Vec<Token> },
    /// `*em*`
    Em { children: Vec<Token> },
    /// `~~del~~`
    Del { children: Vec<Token> },
    /// `` `code` ``
    Code { children: Vec<Token> },
    /// `[text](href)`
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    Link { href: String, children: Vec<Token> },
}

impl Token {
    /// Create a [`Token::RawText`].
    pub fn raw(text: impl Into<String>) -> Self {
        Self::RawText { text: text.into() }
    }

    /// Whether this token stands alone as a document block.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Heading { .. } | Self::Text { .. })
    }

    /// Child tokens, empty for leaf tokens.
    #[must_use]
    pub fn children(&self) -> &[Token] {
        match self {
            Self::Heading { children, .. }
            | Self::Text { children }
            | Self::Strong { children }
            | Self::Em { children }
            | Self::Del { children }
            | Self::Code { children }
            | Self::Link { children, .. } => children,
            Self::RawText { .. } | Self::NewLine => &[],
        }
    }
}

/// Inline span delimited by a repeated marker character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SpanKind {
    Strong,
    Em,
    Del,
    Code,
}

impl SpanKind {
    /// Marker character opening and closing the span.
    pub(crate) fn delimiter(self) -> char {
        match self {
            Self::Strong | Self::Em => '*',
            Self::Del => '~',
            Self::Code => '`',
        }
    }

    /// Number of marker characters on each side.
    pub(crate) fn width(self) -> usize {
        match self {
            Self::Strong | Self::Del => 2,
            Self::Em | Self::Code => 1,
        }
    }

    pub(crate) fn into_token(self, children: Vec<Token>) -> Token {
        match self {
            Self::Strong => Token::Strong { children },
            Self::Em => Token::Em { children },
            Self::Del => Token::Del { children },
            Self::Code => Token::Code { children },
        }
    }
}
