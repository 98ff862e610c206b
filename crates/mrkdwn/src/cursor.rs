//! Character cursor with one-character lookahead and backtracking marks.

/// Saved cursor position, used to roll back an abandoned tentative parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Mark(usize);

impl Mark {
    /// Character offset of the mark.
    pub(crate) fn offset(self) -> usize {
        self.0
    }
}

/// Forward-only scan position over a character sequence.
#[derive(Debug)]
pub(crate) struct Cursor {
    chars: Vec<char>,
    position: usize,
}

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

impl Cursor {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Number of characters in the input.
    pub(crate) fn input_len(&self) -> usize {
        self.chars.len()
    }

    /// Character under the cursor, `None` at end of input.
    pub(crate) fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Character after the cursor, without consuming anything.
    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    pub(crate) fn advance(&mut self) {
        if self.position < self.chars.len() {
            self.position += 1;
        }
    }

    pub(crate) fn advance_by(&mut self, n: usize) {
        self.position = (self.position + n).min(self.chars.len());
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark(self.position)
    }

    pub(crate) fn reset(&mut self, mark: Mark) {
        self.position = mark.0;
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Whether the cursor sits on a newline or past the end of input.
    pub(crate) fn at_end_of_line(&self) -> bool {
        matches!(self.current(), None | Some('\n'))
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while self.current().is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// Skip spaces, tabs and carriage returns, stopping at a newline.
    pub(crate) fn skip_spaces(&mut self) {
        while self
            .current()
            .is_some_and(|c| c != '\n' && is_whitespace(c))
        {
            self.position += 1;
        }
    }

    /// Consume characters up to (not including) the next newline.
    pub(crate) fn take_line(&mut self) -> String {
        let mut line = String::new();
        while let Some(c) = self.current().filter(|&c| c != '\n') {
            line.push(c);
            self.position += 1;
        }
        line
    }

    /// Whether the line following the newline under the cursor holds only
    /// whitespace. Looks ahead without moving.
    pub(crate) fn next_line_is_blank(&self) -> bool {
        self.chars[(self.position + 1).min(self.chars.len())..]
            .iter()
            .take_while(|&&c| c != '\n')
            .all(|&c| is_whitespace(c))
    }
}
