//! Character-level recursive-descent parser.
//!
//! The parser runs in one of two modes:
//!
//! - **Document** mode produces block tokens: [`Token::Heading`] for lines
//!   starting with `#`, and [`Token::Text`] paragraphs for everything else.
//! - **Inline** mode produces inline tokens only, with [`Token::NewLine`] at
//!   soft line breaks. It is used for heading text, span contents and link
//!   text, each re-parsed as its own substring.
//!
//! Inline constructs (`**strong**`, `*em*`, `~~del~~`, `` `code` `` and
//! `[text](href)`) are parsed tentatively. A construct that is not closed
//! before the end of its line is abandoned: the cursor is reset to the mark
//! taken at the opening delimiter, and the delimiter is kept as literal text.
//! Parsing therefore never fails.

use crate::cursor::{Cursor, Mark};
use crate::token::{SpanKind, Token};

/// First characters of a line that end the paragraph above it.
const BLOCK_MARKERS: [char; 4] = ['#', '*', '`', '\n'];

fn is_inline_special(c: char) -> bool {
    matches!(c, '*' | '~' | '`' | '[')
}

/// Parse a markdown document into block tokens.
///
/// # Example
///
/// ```
/// use mrkdwn::{Token, parse};
///
/// let tokens = parse("# Title\n\nBody text\n");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Heading { depth: 1, children: vec![Token::raw("Title")] },
///         Token::Text { children: vec![Token::raw("Body text")] },
///     ]
/// );
/// ```
pub fn parse(markdown: &str) -> Vec<Token> {
    Parser::document(markdown).parse()
}

/// Parse a fragment of inline markdown. Never yields block tokens.
pub fn parse_inline(text: &str) -> Vec<Token> {
    Parser::inline(text).parse()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Document,
    Inline,
}

/// Markdown parser over a single input string.
///
/// A parser is consumed by [`Parser::parse`]; every call re-parses from
/// scratch.
#[derive(Debug)]
pub struct Parser {
    cursor: Cursor,
    mode: Mode,
}

impl Parser {
    /// Create a parser producing block tokens.
    #[must_use]
    pub fn document(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            mode: Mode::Document,
        }
    }

    /// Create a parser producing inline tokens.
    #[must_use]
    pub fn inline(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            mode: Mode::Inline,
        }
    }

    /// Run the parser to the end of its input.
    pub fn parse(mut self) -> Vec<Token> {
        match self.mode {
            Mode::Document => {
                let blocks = self.parse_blocks();
                tracing::debug!(
                    chars = self.cursor.input_len(),
                    blocks = blocks.len(),
                    "Parsed markdown document"
                );
                blocks
            }
            Mode::Inline => self.parse_inlines(),
        }
    }

    fn parse_blocks(&mut self) -> Vec<Token> {
        let mut blocks = Vec::new();

        loop {
            self.cursor.skip_whitespace();
            let Some(c) = self.cursor.current() else {
                break;
            };

            let block = if c == '#' {
                self.parse_heading()
            } else {
                self.parse_paragraph()
            };
            blocks.push(block);
        }

        blocks
    }

    fn parse_heading(&mut self) -> Token {
        let mut depth = 0;
        while self.cursor.current() == Some('#') {
            depth += 1;
            self.cursor.advance();
        }

        let text = self.cursor.take_line();
        Token::Heading {
            depth,
            children: parse_inline(&text),
        }
    }

    /// Accumulate physical lines into one paragraph.
    ///
    /// Only the first inline construct found before the last line is parsed;
    /// later markup on non-final lines stays literal. The last line is always
    /// re-parsed inline in full.
    fn parse_paragraph(&mut self) -> Token {
        let mut children = Vec::new();
        let mut line = String::new();
        let mut triggered = false;

        loop {
            while let Some(c) = self.cursor.current().filter(|&c| c != '\n') {
                if triggered || !is_inline_special(c) {
                    line.push(c);
                    self.cursor.advance();
                } else if let Some(token) = self.try_construct() {
                    flush_raw(&mut children, &mut line);
                    children.push(token);
                    triggered = true;
                } else {
                    self.take_literal(&mut line);
                }
            }

            if self.paragraph_ends() {
                break;
            }

            flush_raw(&mut children, &mut line);
            children.push(Token::NewLine);
            self.cursor.advance();
        }

        children.extend(parse_inline(&line));
        Token::Text { children }
    }

    /// Decide, with the cursor on a newline or at end of input, whether the
    /// paragraph stops here.
    fn paragraph_ends(&self) -> bool {
        if self.cursor.at_eof() {
            return true;
        }

        match self.cursor.peek() {
            Some(next) if BLOCK_MARKERS.contains(&next) => true,
            _ => !self.soft_break_follows(),
        }
    }

    /// Whether the newline under the cursor continues onto a non-blank line.
    fn soft_break_follows(&self) -> bool {
        self.cursor.peek().is_some() && !self.cursor.next_line_is_blank()
    }

    fn parse_inlines(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut line_has_content = false;

        loop {
            self.cursor.skip_spaces();
            match self.cursor.current() {
                None => break,
                Some('\n') => {
                    if line_has_content && self.soft_break_follows() {
                        tokens.push(Token::NewLine);
                    }
                    line_has_content = false;
                    self.cursor.advance();
                }
                Some(_) => {
                    self.parse_inline_run(&mut tokens);
                    line_has_content = true;
                }
            }
        }

        tokens
    }

    /// Scan literal text until a construct is recognised or the line ends.
    fn parse_inline_run(&mut self, tokens: &mut Vec<Token>) {
        let mut text = String::new();

        while !self.cursor.at_end_of_line() {
            let Some(c) = self.cursor.current() else {
                break;
            };

            if !is_inline_special(c) {
                text.push(c);
                self.cursor.advance();
            } else if let Some(token) = self.try_construct() {
                flush_raw(tokens, &mut text);
                tokens.push(token);
                return;
            } else {
                self.take_literal(&mut text);
            }
        }

        flush_raw(tokens, &mut text);
    }

    /// Attempt the construct opened by the character under the cursor.
    ///
    /// On failure the cursor is left where it was.
    fn try_construct(&mut self) -> Option<Token> {
        match (self.cursor.current()?, self.cursor.peek()) {
            ('*', Some('*')) => self.parse_span(SpanKind::Strong),
            ('*', _) => self.parse_span(SpanKind::Em),
            ('~', Some('~')) => self.parse_span(SpanKind::Del),
            ('`', _) => self.parse_span(SpanKind::Code),
            ('[', _) => self.parse_link(),
            _ => None,
        }
    }

    /// Keep the delimiter under the cursor as literal text.
    fn take_literal(&mut self, text: &mut String) {
        let width = match (self.cursor.current(), self.cursor.peek()) {
            (Some('*'), Some('*')) | (Some('~'), Some('~')) => 2,
            _ => 1,
        };

        for _ in 0..width {
            if let Some(c) = self.cursor.current() {
                text.push(c);
                self.cursor.advance();
            }
        }
    }

    fn parse_span(&mut self, kind: SpanKind) -> Option<Token> {
        let start = self.cursor.mark();
        let delimiter = kind.delimiter();
        let width = kind.width();
        self.cursor.advance_by(width);

        let mut inner = String::new();
        loop {
            match self.cursor.current() {
                None | Some('\n') => return self.abandon(start, kind_name(kind)),
                Some(c) if c == delimiter && (width == 1 || self.cursor.peek() == Some(c)) => {
                    break;
                }
                Some(c) => {
                    inner.push(c);
                    self.cursor.advance();
                }
            }
        }

        self.cursor.advance_by(width);
        Some(kind.into_token(parse_inline(&inner)))
    }

    fn parse_link(&mut self) -> Option<Token> {
        let start = self.cursor.mark();
        self.cursor.advance();

        let Some(text) = self.scan_until(']') else {
            return self.abandon(start, "link");
        };
        self.cursor.advance();

        if self.cursor.current() != Some('(') {
            return self.abandon(start, "link");
        }
        self.cursor.advance();

        let Some(href) = self.scan_until(')') else {
            return self.abandon(start, "link");
        };
        self.cursor.advance();

        Some(Token::Link {
            href,
            children: parse_inline(&text),
        })
    }

    /// Collect characters up to `close` on the current line.
    ///
    /// Returns `None` if the line ends first. The cursor stays on `close`.
    fn scan_until(&mut self, close: char) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None | Some('\n') => return None,
                Some(c) if c == close => return Some(text),
                Some(c) => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
    }

    fn abandon(&mut self, start: Mark, construct: &'static str) -> Option<Token> {
        tracing::trace!(
            construct,
            offset = start.offset(),
            "Unterminated construct, falling back to text"
        );
        self.cursor.reset(start);
        None
    }
}

fn kind_name(kind: SpanKind) -> &'static str {
    match kind {
        SpanKind::Strong => "strong",
        SpanKind::Em => "em",
        SpanKind::Del => "del",
        SpanKind::Code => "code",
    }
}

/// Push `text` as trimmed [`Token::RawText`] unless it is blank, then clear it.
fn flush_raw(tokens: &mut Vec<Token>, text: &mut String) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        tokens.push(Token::raw(trimmed));
    }
    text.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(children: Vec<Token>) -> Token {
        Token::Text { children }
    }

    fn heading(depth: usize, children: Vec<Token>) -> Token {
        Token::Heading { depth, children }
    }

    fn raw(text: &str) -> Token {
        Token::raw(text)
    }

    fn em(text: &str) -> Token {
        Token::Em {
            children: vec![raw(text)],
        }
    }

    fn link(href: &str, children: Vec<Token>) -> Token {
        Token::Link {
            href: href.to_owned(),
            children,
        }
    }

    #[test]
    fn test_text_is_parsed() {
        assert_eq!(parse("sample text\n"), vec![text(vec![raw("sample text")])]);
    }

    #[test]
    fn test_multiline_text_is_one_block() {
        assert_eq!(
            parse("sample text\non multiple lines\n"),
            vec![text(vec![
                raw("sample text"),
                Token::NewLine,
                raw("on multiple lines"),
            ])]
        );
    }

    #[test]
    fn test_text_stops_before_heading() {
        assert_eq!(
            parse("sample text\n# on multiple lines\n"),
            vec![
                text(vec![raw("sample text")]),
                heading(1, vec![raw("on multiple lines")]),
            ]
        );
    }

    #[test]
    fn test_blank_lines_split_paragraphs() {
        assert_eq!(
            parse("sample text\n\n\nsome more text\n"),
            vec![
                text(vec![raw("sample text")]),
                text(vec![raw("some more text")]),
            ]
        );
    }

    #[test]
    fn test_whitespace_only_line_splits_paragraphs() {
        assert_eq!(
            parse("first\n  \t\nsecond"),
            vec![text(vec![raw("first")]), text(vec![raw("second")])]
        );
    }

    #[test]
    fn test_unterminated_em_is_literal() {
        assert_eq!(parse("*text\n"), vec![text(vec![raw("*text")])]);
    }

    #[test]
    fn test_unterminated_strong_is_literal() {
        assert_eq!(parse("**x"), vec![text(vec![raw("**x")])]);
        assert_eq!(parse("a **b"), vec![text(vec![raw("a **b")])]);
    }

    #[test]
    fn test_lone_tilde_is_literal() {
        assert_eq!(parse("a ~ b~c"), vec![text(vec![raw("a ~ b~c")])]);
    }

    #[test]
    fn test_link_within_text() {
        assert_eq!(
            parse("left [GITHUB](https://github.com/) right\n"),
            vec![text(vec![
                raw("left"),
                link("https://github.com/", vec![raw("GITHUB")]),
                raw("right"),
            ])]
        );
    }

    #[test]
    fn test_link_without_href_is_literal() {
        assert_eq!(
            parse("[text] no paren"),
            vec![text(vec![raw("[text] no paren")])]
        );
        assert_eq!(parse("[open"), vec![text(vec![raw("[open")])]);
        assert_eq!(parse("[a](b"), vec![text(vec![raw("[a](b")])]);
    }

    #[test]
    fn test_empty_link() {
        assert_eq!(parse("[]()"), vec![text(vec![link("", vec![])])]);
    }

    #[test]
    fn test_link_text_is_parsed_inline() {
        assert_eq!(
            parse("[*hi*](x)"),
            vec![text(vec![link("x", vec![em("hi")])])]
        );
    }

    #[test]
    fn test_strong_is_parsed() {
        assert_eq!(
            parse("**bold text**\n"),
            vec![text(vec![Token::Strong {
                children: vec![raw("bold text")],
            }])]
        );
    }

    #[test]
    fn test_strong_containing_em() {
        assert_eq!(
            parse("**bold *em* text**"),
            vec![text(vec![Token::Strong {
                children: vec![raw("bold"), em("em"), raw("text")],
            }])]
        );
    }

    #[test]
    fn test_empty_strong() {
        assert_eq!(
            parse("****"),
            vec![text(vec![Token::Strong { children: vec![] }])]
        );
    }

    #[test]
    fn test_em_is_parsed() {
        assert_eq!(
            parse("*emphasised text*\n"),
            vec![text(vec![em("emphasised text")])]
        );
    }

    #[test]
    fn test_em_directly_after_text() {
        assert_eq!(parse("a*b*"), vec![text(vec![raw("a"), em("b")])]);
    }

    #[test]
    fn test_em_in_heading() {
        assert_eq!(
            parse("## emphasised *text*\n"),
            vec![heading(2, vec![raw("emphasised"), em("text")])]
        );
    }

    #[test]
    fn test_del_is_parsed() {
        assert_eq!(
            parse("~~stricken text~~\n"),
            vec![text(vec![Token::Del {
                children: vec![raw("stricken text")],
            }])]
        );
    }

    #[test]
    fn test_code_is_parsed() {
        assert_eq!(
            parse("`code text`\n"),
            vec![text(vec![Token::Code {
                children: vec![raw("code text")],
            }])]
        );
    }

    #[test]
    fn test_heading_depths() {
        assert_eq!(
            parse("# sample heading\n###### another heading\n"),
            vec![
                heading(1, vec![raw("sample heading")]),
                heading(6, vec![raw("another heading")]),
            ]
        );
    }

    #[test]
    fn test_heading_depth_is_uncapped() {
        assert_eq!(parse("####### deep"), vec![heading(7, vec![raw("deep")])]);
    }

    #[test]
    fn test_empty_heading() {
        assert_eq!(parse("#\n"), vec![heading(1, vec![])]);
    }

    #[test]
    fn test_anchor_is_parsed() {
        assert_eq!(
            parse("[GITHUB](https://github.com/)\n"),
            vec![text(vec![link("https://github.com/", vec![raw("GITHUB")])])]
        );
    }

    #[test]
    fn test_link_within_sentence() {
        assert_eq!(
            parse(
                "This is sample markdown for the [Mailchimp](https://www.mailchimp.com) homework assignment.\n"
            ),
            vec![text(vec![
                raw("This is sample markdown for the"),
                link("https://www.mailchimp.com", vec![raw("Mailchimp")]),
                raw("homework assignment."),
            ])]
        );
    }

    #[test]
    fn test_only_first_construct_before_last_line() {
        assert_eq!(
            parse("a *b* c *d*\ne"),
            vec![text(vec![
                raw("a"),
                em("b"),
                raw("c *d*"),
                Token::NewLine,
                raw("e"),
            ])]
        );
    }

    #[test]
    fn test_last_line_is_fully_parsed() {
        assert_eq!(
            parse("a *b*\nc *d*"),
            vec![text(vec![
                raw("a"),
                em("b"),
                Token::NewLine,
                raw("c"),
                em("d"),
            ])]
        );
    }

    #[test]
    fn test_line_starting_with_marker_starts_new_block() {
        assert_eq!(
            parse("a\n*b*"),
            vec![text(vec![raw("a")]), text(vec![em("b")])]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            parse("a\r\nb\r\n"),
            vec![text(vec![raw("a"), Token::NewLine, raw("b")])]
        );
    }

    #[test]
    fn test_unicode_text() {
        assert_eq!(
            parse("héllo *wörld*"),
            vec![text(vec![raw("héllo"), em("wörld")])]
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(parse(""), vec![]);
        assert_eq!(parse("  \n\t\r\n"), vec![]);
    }

    #[test]
    fn test_inline_mode_has_no_blocks() {
        assert_eq!(parse_inline("# not a heading"), vec![raw("# not a heading")]);
        assert_eq!(
            parse_inline("# one\n# two"),
            vec![raw("# one"), Token::NewLine, raw("# two")]
        );
    }

    #[test]
    fn test_inline_mode_keeps_soft_breaks() {
        assert_eq!(parse_inline("one\ntwo"), vec![raw("one"), Token::NewLine, raw("two")]);
        assert_eq!(
            parse_inline("*a*\nb\r\n`c`\n"),
            vec![
                em("a"),
                Token::NewLine,
                raw("b"),
                Token::NewLine,
                Token::Code {
                    children: vec![raw("c")],
                },
            ]
        );
    }

    #[test]
    fn test_inline_mode_blank_lines_are_not_breaks() {
        assert_eq!(parse_inline("one\n  \ntwo"), vec![raw("one"), raw("two")]);
        assert_eq!(parse_inline("\none\n"), vec![raw("one")]);
        assert_eq!(parse_inline("\n\n"), vec![]);
    }

    #[test]
    fn test_document_has_only_block_tokens() {
        let inputs = [
            "**bold** and more",
            "`code` first\nthen text",
            "[x](y) *z*\n\n# h\n~~d~~",
        ];

        for input in inputs {
            assert!(parse(input).iter().all(Token::is_block), "{input:?}");
        }
    }

    #[test]
    fn test_malformed_input_yields_well_formed_tokens() {
        let inputs = [
            "*", "**", "***", "~", "~~", "`", "``", "[", "]", "[]", "[](", "(", "#", "##\n#",
            "*a**b*", "**a*", "~~a~", "[a]\n(b)", "[a](\nb)", "a\n\n\n", "\n*\n*\n",
            "`a\nb`", "[*](*)", "x*", "*\n", "\r", "#*#*",
        ];

        for input in inputs {
            assert!(parse(input).iter().all(Token::is_block), "{input:?}");
            assert!(!parse_inline(input).iter().any(Token::is_block), "{input:?}");
        }
    }

    #[test]
    fn test_line_starting_with_backtick_starts_new_block() {
        assert_eq!(
            parse("a\n`b`\n"),
            vec![
                text(vec![raw("a")]),
                text(vec![Token::Code {
                    children: vec![raw("b")],
                }]),
            ]
        );
    }

    #[test]
    fn test_line_starting_with_tilde_continues_paragraph() {
        assert_eq!(
            parse("x\n~~y~~ z"),
            vec![text(vec![
                raw("x"),
                Token::NewLine,
                Token::Del {
                    children: vec![raw("y")],
                },
                raw("z"),
            ])]
        );
    }

    #[test]
    fn test_unterminated_code_is_literal() {
        assert_eq!(parse("`a\n"), vec![text(vec![raw("`a")])]);
        assert_eq!(parse("run `make\n"), vec![text(vec![raw("run `make")])]);
    }

    #[test]
    fn test_unterminated_del_is_literal() {
        assert_eq!(parse("~~a~\n"), vec![text(vec![raw("~~a~")])]);
        assert_eq!(parse("~~a"), vec![text(vec![raw("~~a")])]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "# Title\n\nSome *em* and [a](b).\nNext line\n";
        assert_eq!(parse(input), parse(input));
    }
}
