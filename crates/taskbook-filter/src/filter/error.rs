//! Error types for the filter compiler.
//!
//! Every failure carries an [`ErrorKind`] and, except for
//! [`ErrorKind::UnexpectedEndOfString`], the [`Span`] of the source text that
//! caused it so the command layer can underline it.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// A byte range into the filter source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an empty span marking a single position.
    pub fn point(position: usize) -> Self {
        Self::new(position, position)
    }

    /// Returns the span as a range usable for slicing.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The kind of a filter failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    // ==================== Tokenizer ====================
    /// A quoted string was not closed.
    #[error("missing closing quote")]
    MissingEndQuote,

    /// A quote character appeared inside an unquoted word.
    #[error("unexpected quote")]
    UnexpectedQuote,

    /// Nothing at the cursor could be consumed.
    #[error("no matchable character")]
    NoMatchableCharacter,

    /// The tokenizer ran out of input.
    #[error("end of input")]
    EndOfString,

    // ==================== Expression ====================
    /// An opening bracket was never closed.
    #[error("mismatched left bracket")]
    MismatchedLeftBracket,

    /// A closing bracket has no opening partner.
    #[error("mismatched right bracket")]
    MismatchedRightBracket,

    /// A binary operator appeared where an operand was expected.
    #[error("unexpected binary operator")]
    UnexpectedBinaryOperator,

    /// A closing bracket appeared where an operand was expected.
    #[error("unexpected right bracket")]
    UnexpectedRightBracket,

    /// The expression ended where an operand was expected.
    #[error("unexpected end of expression")]
    UnexpectedEndOfString,

    // ==================== Predicate ====================
    /// The filter key names no known field.
    #[error("invalid filter key")]
    InvalidKey,

    /// A set operator was used with a field that is not a set.
    #[error("invalid set key")]
    InvalidSetKey,

    /// The operator is not supported by the field.
    #[error("invalid operator")]
    InvalidOperator,

    /// The set operator is not supported by the field.
    #[error("invalid set operator")]
    InvalidSetOperator,

    /// The phrase does not describe a value of the field.
    #[error("invalid test phrase")]
    InvalidTestPhrase,
}

impl ErrorKind {
    /// Returns a stable identifier for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingEndQuote => "MISSING_END_QUOTE",
            ErrorKind::UnexpectedQuote => "UNEXPECTED_QUOTE",
            ErrorKind::NoMatchableCharacter => "NO_MATCHABLE_CHARACTER",
            ErrorKind::EndOfString => "END_OF_STRING",
            ErrorKind::MismatchedLeftBracket => "MISMATCHED_LEFT_BRACKET",
            ErrorKind::MismatchedRightBracket => "MISMATCHED_RIGHT_BRACKET",
            ErrorKind::UnexpectedBinaryOperator => "UNEXPECTED_BINARY_OPERATOR",
            ErrorKind::UnexpectedRightBracket => "UNEXPECTED_RIGHT_BRACKET",
            ErrorKind::UnexpectedEndOfString => "UNEXPECTED_END_OF_STRING",
            ErrorKind::InvalidKey => "INVALID_KEY",
            ErrorKind::InvalidSetKey => "INVALID_SET_KEY",
            ErrorKind::InvalidOperator => "INVALID_OPERATOR",
            ErrorKind::InvalidSetOperator => "INVALID_SET_OPERATOR",
            ErrorKind::InvalidTestPhrase => "INVALID_TEST_PHRASE",
        }
    }
}

/// An error raised while compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FilterError {
    kind: ErrorKind,
    message: String,
    span: Option<Span>,
    #[source]
    source: Option<Box<FilterError>>,
}

impl FilterError {
    /// Creates an error anchored at `span`.
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Some(span),
            source: None,
        }
    }

    /// Creates an error with no position in the source.
    pub fn unanchored(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            source: None,
        }
    }

    /// Creates the error for an expression that stops where an operand is needed.
    pub fn unexpected_end_of_string() -> Self {
        Self::unanchored(
            ErrorKind::UnexpectedEndOfString,
            "the expression ends where a filter was expected",
        )
    }

    /// Wraps `cause` in a new error of `kind` anchored at `span`.
    pub fn wrap(kind: ErrorKind, message: impl Into<String>, span: Span, cause: FilterError) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Some(span),
            source: Some(Box::new(cause)),
        }
    }

    /// Returns the kind of failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending source range, if the error has one.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns the lower-level error this one wraps, if any.
    pub fn cause(&self) -> Option<&FilterError> {
        self.source.as_deref()
    }

    /// Splits `source` around the error span into (before, offending, after).
    ///
    /// Errors without a span, or with a span that does not fit `source`,
    /// highlight the end of the input.
    pub fn highlight<'s>(&self, source: &'s str) -> (&'s str, &'s str, &'s str) {
        let span = self
            .span
            .filter(|s| {
                s.start <= s.end
                    && s.end <= source.len()
                    && source.is_char_boundary(s.start)
                    && source.is_char_boundary(s.end)
            })
            .unwrap_or_else(|| Span::point(source.len()));
        (
            &source[..span.start],
            &source[span.as_range()],
            &source[span.end..],
        )
    }
}
