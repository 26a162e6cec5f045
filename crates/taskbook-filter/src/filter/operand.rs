//! Reader for filter units, the operands of a filter expression.
//!
//! A unit is one of:
//!
//! - `key op phrase`, e.g. `p>1`
//! - `key set_op field_op phrase`, e.g. `t>:CS2103`
//! - a bare `phrase`, tried against every field that accepts it
//!
//! The key and operator forms are tried first; if the text at the cursor does
//! not start with letters immediately followed by an operator, the reader
//! rewinds and reads a bare phrase instead.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::ast::Filter;
use super::compiler::{self, Spanned};
use super::error::{ErrorKind, FilterError, FilterResult, Span};
use super::key::{FilterKey, FilterOperator};
use super::parser::ReservedChars;
use super::tokenizer::{Lexeme, Tokenizer};

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+").expect("key pattern is valid"));

static FILTER_OPERATOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[:=<>]+").expect("filter operator pattern is valid"));

/// Returns true for characters allowed in an unquoted phrase.
pub fn is_phrase_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '\\' | ',' | '.')
}

/// Reads one filter unit at the cursor and compiles it.
///
/// # Errors
///
/// - `InvalidKey` if the letters before an operator name no field.
/// - `InvalidSetOperator` if more than two operators follow the key.
/// - `InvalidSetKey`, `InvalidOperator` or `InvalidTestPhrase` from the compiler.
/// - `InvalidTestPhrase` wrapping the tokenizer error if no phrase can be read.
pub fn read_operand(tokenizer: &mut Tokenizer<'_>, is_reserved: ReservedChars) -> FilterResult<Filter> {
    tokenizer.has_next_token();
    let start = tokenizer.location();

    if let Some(key) = tokenizer.try_next_pattern(&KEY_PATTERN) {
        if let Some(operators) = tokenizer.try_next_pattern(&FILTER_OPERATOR_PATTERN) {
            return read_keyed_unit(tokenizer, is_reserved, key, operators);
        }
    }

    tokenizer.set_location(start);
    let phrase = read_phrase(tokenizer, is_reserved, || "expected a filter".to_string())?;
    trace!(phrase = phrase.text, span = %phrase.span, "bare phrase");
    Ok(compiler::compile_bare_phrase(phrase))
}

fn read_keyed_unit(
    tokenizer: &mut Tokenizer<'_>,
    is_reserved: ReservedChars,
    key: Lexeme<'_>,
    operators: Lexeme<'_>,
) -> FilterResult<Filter> {
    let resolved = FilterKey::from_alias(key.text).ok_or_else(|| unknown_key(key))?;
    let key_span = Spanned::new(resolved, key.span);

    let symbols = split_operators(operators);
    if symbols.len() > 2 {
        return Err(FilterError::new(
            ErrorKind::InvalidSetOperator,
            format!(
                "expected a set operator and a field operator after {}, found {}",
                key.text, operators.text
            ),
            operators.span,
        ));
    }

    let phrase = read_phrase(tokenizer, is_reserved, || {
        format!("expected a phrase after {}{}", key.text, operators.text)
    })?;
    trace!(key = %resolved, operators = operators.text, phrase = phrase.text, "filter unit");

    let condition = match symbols.as_slice() {
        [operator] => compiler::compile_unit(key_span, *operator, phrase)?,
        [set_operator, field_operator] => {
            compiler::compile_set_unit(key_span, *set_operator, *field_operator, phrase)?
        }
        _ => {
            return Err(FilterError::new(
                ErrorKind::InvalidOperator,
                "expected an operator",
                operators.span,
            ))
        }
    };
    Ok(condition.into())
}

/// Splits a run of operator characters into spanned operators.
fn split_operators(operators: Lexeme<'_>) -> Vec<Spanned<FilterOperator>> {
    operators
        .text
        .char_indices()
        .filter_map(|(offset, c)| {
            let end = offset + c.len_utf8();
            let operator = FilterOperator::from_symbol(&operators.text[offset..end])?;
            let span = Span::new(operators.span.start + offset, operators.span.start + end);
            Some(Spanned::new(operator, span))
        })
        .collect()
}

fn unknown_key(key: Lexeme<'_>) -> FilterError {
    let mut message = format!("unknown filter key '{}'", key.text);
    if let Some(suggestion) = FilterKey::suggest(key.text) {
        message.push_str(&format!(", did you mean '{suggestion}'?"));
    }
    FilterError::new(ErrorKind::InvalidKey, message, key.span)
}

/// Reads a phrase, re-reporting tokenizer failures as an invalid phrase.
fn read_phrase<'a>(
    tokenizer: &mut Tokenizer<'a>,
    is_reserved: ReservedChars,
    context: impl FnOnce() -> String,
) -> FilterResult<Lexeme<'a>> {
    tokenizer
        .next_string(|c| is_phrase_char(c) && !is_reserved(c))
        .map_err(|e| {
            let span = e
                .span()
                .unwrap_or_else(|| Span::point(tokenizer.source().len()));
            FilterError::wrap(ErrorKind::InvalidTestPhrase, context(), span, e)
        })
}
