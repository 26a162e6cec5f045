//! Tokenizer for filter expressions.
//!
//! Unlike a batch lexer, the tokenizer is pulled one token at a time by the
//! parser, which decides what kind of token it expects next. The cursor can be
//! saved and restored so callers can try one reading and fall back to another.

use regex::{Captures, Regex};

use super::error::{ErrorKind, FilterError, FilterResult, Span};

/// A character classification used for delimiters and quotes.
pub type CharClass = fn(char) -> bool;

/// Default quote classification: single or double quote.
pub fn is_default_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// A slice of the source returned by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    /// The token text. For quoted strings this is the content between the quotes.
    pub text: &'a str,
    /// Where the token sits in the source, quotes included.
    pub span: Span,
}

/// A regex match anchored at the cursor, with its capture groups.
#[derive(Debug)]
pub struct Matched<'a> {
    captures: Captures<'a>,
    offset: usize,
    span: Span,
}

impl<'a> Matched<'a> {
    /// Returns the span of the whole match.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the named capture group, if it took part in the match.
    pub fn group(&self, name: &str) -> Option<Lexeme<'a>> {
        self.captures.name(name).map(|m| Lexeme {
            text: m.as_str(),
            span: Span::new(self.offset + m.start(), self.offset + m.end()),
        })
    }
}

/// Pull-based tokenizer over a filter source string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    /// Byte offset of the cursor.
    position: usize,
    is_delimiter: CharClass,
    is_quote: CharClass,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer that splits on whitespace and honors `'` and `"` quotes.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            is_delimiter: char::is_whitespace,
            is_quote: is_default_quote,
        }
    }

    /// Replaces the delimiter classification.
    pub fn with_delimiter(mut self, is_delimiter: CharClass) -> Self {
        self.is_delimiter = is_delimiter;
        self
    }

    /// Replaces the quote classification.
    pub fn with_quote(mut self, is_quote: CharClass) -> Self {
        self.is_quote = is_quote;
        self
    }

    /// Returns the full source string.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the cursor position.
    pub fn location(&self) -> usize {
        self.position
    }

    /// Moves the cursor back (or forward) to a position from [`Tokenizer::location`].
    pub fn set_location(&mut self, position: usize) {
        debug_assert!(position <= self.source.len());
        debug_assert!(self.source.is_char_boundary(position));
        self.position = position;
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_delimiters(&mut self) {
        while let Some(c) = self.peek() {
            if !(self.is_delimiter)(c) {
                break;
            }
            self.position += c.len_utf8();
        }
    }

    /// Span of the character at the cursor, or a point at the end of input.
    fn span_at_cursor(&self) -> Span {
        match self.peek() {
            Some(c) => Span::new(self.position, self.position + c.len_utf8()),
            None => Span::point(self.position),
        }
    }

    fn end_of_string(&self) -> FilterError {
        FilterError::new(
            ErrorKind::EndOfString,
            "reached the end of the input",
            Span::point(self.source.len()),
        )
    }

    /// Skips delimiters and reports whether any input remains.
    ///
    /// Calling this repeatedly has the same effect as calling it once.
    pub fn has_next_token(&mut self) -> bool {
        self.skip_delimiters();
        self.position < self.source.len()
    }

    /// Reads the next string token.
    ///
    /// A token that starts with a quote runs to the matching quote of the same
    /// kind and is returned without its quotes. Any other token runs while the
    /// characters are not delimiters and are accepted by `is_valid`.
    ///
    /// # Errors
    ///
    /// - `MissingEndQuote` if a quoted token is not closed.
    /// - `UnexpectedQuote` if a quote appears inside an unquoted token.
    /// - `NoMatchableCharacter` if the first character is rejected by `is_valid`.
    /// - `EndOfString` if no input remains.
    ///
    /// On error the cursor is left where the token would have started.
    pub fn next_string(&mut self, is_valid: impl Fn(char) -> bool) -> FilterResult<Lexeme<'a>> {
        if !self.has_next_token() {
            return Err(self.end_of_string());
        }

        let start = self.position;
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            return Err(self.end_of_string());
        };

        if (self.is_quote)(first) {
            let content_start = start + first.len_utf8();
            let Some(length) = self.source[content_start..].find(first) else {
                return Err(FilterError::new(
                    ErrorKind::MissingEndQuote,
                    format!("no closing {first} for the quote opened here"),
                    Span::new(start, self.source.len()),
                ));
            };
            let content_end = content_start + length;
            self.position = content_end + first.len_utf8();
            return Ok(Lexeme {
                text: &self.source[content_start..content_end],
                span: Span::new(start, self.position),
            });
        }

        let mut end = start;
        for (offset, c) in rest.char_indices() {
            if (self.is_quote)(c) {
                let at = start + offset;
                return Err(FilterError::new(
                    ErrorKind::UnexpectedQuote,
                    format!("{c} may only start a quoted phrase"),
                    Span::new(at, at + c.len_utf8()),
                ));
            }
            if (self.is_delimiter)(c) || !is_valid(c) {
                break;
            }
            end = start + offset + c.len_utf8();
        }

        if end == start {
            return Err(FilterError::new(
                ErrorKind::NoMatchableCharacter,
                format!("{first} cannot appear here"),
                self.span_at_cursor(),
            ));
        }

        self.position = end;
        Ok(Lexeme {
            text: &self.source[start..end],
            span: Span::new(start, end),
        })
    }

    /// Finds a non-empty match of `pattern` starting exactly at the cursor.
    fn anchored_captures(&self, pattern: &Regex) -> Option<(Captures<'a>, Span)> {
        let rest = self.rest();
        let captures = pattern.captures(rest)?;
        let whole = captures.get(0)?;
        if whole.start() != 0 || whole.is_empty() {
            return None;
        }
        let span = Span::new(self.position, self.position + whole.end());
        Some((captures, span))
    }

    fn no_match(&self, pattern: &Regex) -> FilterError {
        if self.position >= self.source.len() {
            return self.end_of_string();
        }
        FilterError::new(
            ErrorKind::NoMatchableCharacter,
            format!("expected text matching {}", pattern.as_str()),
            self.span_at_cursor(),
        )
    }

    /// Reads a token matching `pattern` at the cursor.
    ///
    /// Delimiters are not skipped; call [`Tokenizer::has_next_token`] first when
    /// the token may be preceded by whitespace.
    ///
    /// # Errors
    ///
    /// Returns `NoMatchableCharacter` (or `EndOfString` at the end of input) and
    /// leaves the cursor unmoved if the pattern does not match here.
    pub fn next_pattern(&mut self, pattern: &Regex) -> FilterResult<Lexeme<'a>> {
        let span = self
            .anchored_captures(pattern)
            .map(|(_, span)| span)
            .ok_or_else(|| self.no_match(pattern))?;
        self.position = span.end;
        Ok(Lexeme {
            text: &self.source[span.as_range()],
            span,
        })
    }

    /// Like [`Tokenizer::next_pattern`], but returns `None` on mismatch.
    pub fn try_next_pattern(&mut self, pattern: &Regex) -> Option<Lexeme<'a>> {
        self.next_pattern(pattern).ok()
    }

    /// Reads a token matching `pattern` at the cursor, keeping its capture groups.
    ///
    /// # Errors
    ///
    /// Same as [`Tokenizer::next_pattern`].
    pub fn next_matcher(&mut self, pattern: &Regex) -> FilterResult<Matched<'a>> {
        let offset = self.position;
        let (captures, span) = self
            .anchored_captures(pattern)
            .ok_or_else(|| self.no_match(pattern))?;
        self.position = span.end;
        Ok(Matched {
            captures,
            offset,
            span,
        })
    }

    /// Like [`Tokenizer::next_matcher`], but returns `None` on mismatch.
    pub fn try_next_matcher(&mut self, pattern: &Regex) -> Option<Matched<'a>> {
        self.next_matcher(pattern).ok()
    }
}
