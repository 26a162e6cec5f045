//! Field predicate compiler.
//!
//! Turns a resolved key, its operator(s) and the raw phrase into a typed
//! [`Condition`]. The phrase is parsed into the field's value type here, once,
//! so evaluation only compares values.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use tracing::trace;

use super::ast::{Comparison, Condition, Filter, SetRelation};
use super::error::{ErrorKind, FilterError, FilterResult, Span};
use super::key::{FilterKey, FilterOperator};
use super::tokenizer::{Lexeme, Tokenizer};

/// A value together with the source range it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The value.
    pub value: T,
    /// Where it came from.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Pairs a value with its span.
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// Compiles `key op phrase`.
///
/// For set fields the operator is the set operator and items are compared with
/// the field's convenience comparison.
pub fn compile_unit(
    key: Spanned<FilterKey>,
    operator: Spanned<FilterOperator>,
    phrase: Lexeme<'_>,
) -> FilterResult<Condition> {
    if key.value.is_set() {
        let field_operator = Spanned::new(FilterOperator::Convenience, operator.span);
        return compile_set(key.value, operator, field_operator, phrase);
    }
    compile_scalar(key.value, operator, phrase)
}

/// Compiles `key set_op field_op phrase`.
///
/// # Errors
///
/// Returns `InvalidSetKey` at the key span if the key is not a set field.
pub fn compile_set_unit(
    key: Spanned<FilterKey>,
    set_operator: Spanned<FilterOperator>,
    field_operator: Spanned<FilterOperator>,
    phrase: Lexeme<'_>,
) -> FilterResult<Condition> {
    if !key.value.is_set() {
        return Err(FilterError::new(
            ErrorKind::InvalidSetKey,
            format!(
                "{} is not a set field and takes a single operator",
                key.value
            ),
            key.span,
        ));
    }
    compile_set(key.value, set_operator, field_operator, phrase)
}

/// Compiles a bare phrase against every field that accepts it.
///
/// A field whose value type rejects the phrase simply takes no part in the
/// match; if no field accepts it the result matches nothing.
pub fn compile_bare_phrase(phrase: Lexeme<'_>) -> Filter {
    let conditions: Vec<Condition> = FilterKey::ALL
        .into_iter()
        .filter(FilterKey::matches_bare_phrase)
        .filter_map(|key| {
            let operator = Spanned::new(FilterOperator::Convenience, phrase.span);
            let condition = compile_unit(Spanned::new(key, phrase.span), operator, phrase);
            if let Err(e) = &condition {
                trace!(%key, phrase = phrase.text, reason = e.message(), "field skipped for bare phrase");
            }
            condition.ok()
        })
        .collect();
    Filter::any(conditions)
}

// ==================== Scalar fields ====================

fn compile_scalar(
    key: FilterKey,
    operator: Spanned<FilterOperator>,
    phrase: Lexeme<'_>,
) -> FilterResult<Condition> {
    let comparison = scalar_comparison(key, operator)?;
    let condition = match key {
        FilterKey::Name => Condition::Name {
            comparison,
            value: parse_phrase(key, phrase)?,
        },
        FilterKey::Deadline => Condition::Deadline {
            comparison,
            value: parse_phrase(key, phrase)?,
        },
        FilterKey::Priority => Condition::Priority {
            comparison,
            value: parse_phrase(key, phrase)?,
        },
        FilterKey::Frequency => Condition::Frequency {
            comparison,
            value: parse_phrase(key, phrase)?,
        },
        FilterKey::Tag | FilterKey::Attachment => return Err(not_scalar(key, operator)),
    };
    Ok(condition)
}

/// Resolves the operator of a scalar field to a concrete comparison.
///
/// `:` means "contains" for names, "due on or before" for deadlines and
/// "at least" for priority and frequency.
fn scalar_comparison(key: FilterKey, operator: Spanned<FilterOperator>) -> FilterResult<Comparison> {
    let comparison = match (key, operator.value) {
        (FilterKey::Tag | FilterKey::Attachment, _) => return Err(not_scalar(key, operator)),
        (_, FilterOperator::Equal) => Comparison::Equal,
        (_, FilterOperator::Less) => Comparison::AtMost,
        (_, FilterOperator::Greater) => Comparison::AtLeast,
        (FilterKey::Name, FilterOperator::Convenience) => Comparison::Equal,
        (FilterKey::Deadline, FilterOperator::Convenience) => Comparison::AtMost,
        (FilterKey::Priority | FilterKey::Frequency, FilterOperator::Convenience) => {
            Comparison::AtLeast
        }
    };
    Ok(comparison)
}

fn not_scalar(key: FilterKey, operator: Spanned<FilterOperator>) -> FilterError {
    FilterError::new(
        ErrorKind::InvalidOperator,
        format!("{} cannot be compared with {}", key, operator.value),
        operator.span,
    )
}

/// Parses a phrase into a field value, reporting failures at the phrase.
fn parse_phrase<T>(key: FilterKey, phrase: Lexeme<'_>) -> FilterResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    phrase.text.parse().map_err(|e: T::Err| {
        FilterError::new(
            ErrorKind::InvalidTestPhrase,
            format!("not a valid {key}: {e}"),
            phrase.span,
        )
    })
}

// ==================== Set fields ====================

fn compile_set(
    key: FilterKey,
    set_operator: Spanned<FilterOperator>,
    field_operator: Spanned<FilterOperator>,
    phrase: Lexeme<'_>,
) -> FilterResult<Condition> {
    let relation = set_relation(set_operator.value);
    // Items compare exactly; the field operator is accepted but does not
    // change the result.
    trace!(%key, field_operator = %field_operator.value, "set field operator ignored");
    let condition = match key {
        FilterKey::Tag => Condition::Tags {
            relation,
            values: parse_list(key, phrase)?,
        },
        FilterKey::Attachment => Condition::Attachments {
            relation,
            values: parse_list(key, phrase)?,
        },
        FilterKey::Name | FilterKey::Deadline | FilterKey::Priority | FilterKey::Frequency => {
            return Err(FilterError::new(
                ErrorKind::InvalidSetKey,
                format!("{key} does not hold a set of values"),
                set_operator.span,
            ))
        }
    };
    Ok(condition)
}

/// `=` requires equal sets, `<` a subset, `>` or `:` a superset of the test set.
fn set_relation(operator: FilterOperator) -> SetRelation {
    match operator {
        FilterOperator::Equal => SetRelation::Equal,
        FilterOperator::Less => SetRelation::Subset,
        FilterOperator::Greater | FilterOperator::Convenience => SetRelation::Superset,
    }
}

/// Splits a comma-separated, quote-aware phrase into a set of field values.
fn parse_list<T>(key: FilterKey, phrase: Lexeme<'_>) -> FilterResult<BTreeSet<T>>
where
    T: FromStr + Ord,
    T::Err: Display,
{
    // Byte offset of the phrase content, past an opening quote if there was one.
    let quoted = phrase.span.end - phrase.span.start != phrase.text.len();
    let offset = phrase.span.start + usize::from(quoted);

    let mut tokenizer = Tokenizer::new(phrase.text).with_delimiter(|c| c == ',');
    let mut values = BTreeSet::new();
    while tokenizer.has_next_token() {
        let item = tokenizer.next_string(|_| true).map_err(|e| {
            let span = e.span().map_or(phrase.span, |s| {
                Span::new(offset + s.start, offset + s.end)
            });
            FilterError::wrap(
                ErrorKind::InvalidTestPhrase,
                format!("malformed {key} list"),
                span,
                e,
            )
        })?;
        let item_span = Span::new(offset + item.span.start, offset + item.span.end);
        values.insert(parse_phrase(
            key,
            Lexeme {
                text: item.text,
                span: item_span,
            },
        )?);
    }

    if values.is_empty() {
        return Err(FilterError::new(
            ErrorKind::InvalidTestPhrase,
            format!("expected at least one {key}"),
            phrase.span,
        ));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbook_model_rs::models::Tag;

    fn lexeme(text: &str, start: usize) -> Lexeme<'_> {
        Lexeme {
            text,
            span: Span::new(start, start + text.len()),
        }
    }

    fn spanned<T>(value: T, start: usize) -> Spanned<T> {
        Spanned::new(value, Span::new(start, start + 1))
    }

    fn tags(items: &[&str]) -> BTreeSet<Tag> {
        items.iter().map(|t| t.parse().unwrap()).collect()
    }

    #[test]
    fn test_convenience_defaults_per_field() {
        let op = spanned(FilterOperator::Convenience, 1);
        let cases = [
            (FilterKey::Name, "Hello", Comparison::Equal),
            (FilterKey::Deadline, "1/10/2018", Comparison::AtMost),
            (FilterKey::Priority, "2", Comparison::AtLeast),
            (FilterKey::Frequency, "7", Comparison::AtLeast),
        ];
        for (key, text, expected) in cases {
            let condition = compile_unit(spanned(key, 0), op, lexeme(text, 2)).unwrap();
            let comparison = match condition {
                Condition::Name { comparison, .. }
                | Condition::Deadline { comparison, .. }
                | Condition::Priority { comparison, .. }
                | Condition::Frequency { comparison, .. } => comparison,
                other => panic!("unexpected condition {other:?}"),
            };
            assert_eq!(comparison, expected, "key {key}");
        }
    }

    #[test]
    fn test_explicit_operators() {
        let key = spanned(FilterKey::Priority, 0);
        let compile = |op| compile_unit(key, spanned(op, 1), lexeme("3", 2)).unwrap();
        assert_eq!(
            compile(FilterOperator::Equal),
            Condition::Priority {
                comparison: Comparison::Equal,
                value: "3".parse().unwrap()
            }
        );
        assert!(matches!(
            compile(FilterOperator::Less),
            Condition::Priority {
                comparison: Comparison::AtMost,
                ..
            }
        ));
        assert!(matches!(
            compile(FilterOperator::Greater),
            Condition::Priority {
                comparison: Comparison::AtLeast,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_phrase_spans_phrase() {
        let err = compile_unit(
            spanned(FilterKey::Priority, 0),
            spanned(FilterOperator::Greater, 1),
            lexeme("high", 2),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTestPhrase);
        assert_eq!(err.span(), Some(Span::new(2, 6)));
        assert!(err.message().contains("priority"));
    }

    #[test]
    fn test_set_operator_relations() {
        let key = spanned(FilterKey::Tag, 0);
        let relation = |op| match compile_unit(key, spanned(op, 1), lexeme("a,b", 2)).unwrap() {
            Condition::Tags { relation, .. } => relation,
            other => panic!("unexpected condition {other:?}"),
        };
        assert_eq!(relation(FilterOperator::Convenience), SetRelation::Superset);
        assert_eq!(relation(FilterOperator::Equal), SetRelation::Equal);
        assert_eq!(relation(FilterOperator::Less), SetRelation::Subset);
        assert_eq!(relation(FilterOperator::Greater), SetRelation::Superset);
    }

    #[test]
    fn test_list_quote_styles_agree() {
        let key = spanned(FilterKey::Tag, 0);
        let op = spanned(FilterOperator::Convenience, 1);
        let expected = Condition::Tags {
            relation: SetRelation::Superset,
            values: tags(&["x", "y", "z"]),
        };

        let unquoted = compile_unit(key, op, lexeme("x,y,z", 2)).unwrap();
        let double = compile_unit(
            key,
            op,
            Lexeme {
                text: "x,y,z",
                span: Span::new(2, 9),
            },
        )
        .unwrap();
        let inner_quotes = compile_unit(
            key,
            op,
            Lexeme {
                text: "'x',\"y\",z",
                span: Span::new(2, 13),
            },
        )
        .unwrap();

        assert_eq!(unquoted, expected);
        assert_eq!(double, expected);
        assert_eq!(inner_quotes, expected);
    }

    #[test]
    fn test_list_trims_and_deduplicates() {
        let condition = compile_unit(
            spanned(FilterKey::Tag, 0),
            spanned(FilterOperator::Equal, 1),
            Lexeme {
                text: "CS2103, CS2101 ,CS2103",
                span: Span::new(2, 26),
            },
        )
        .unwrap();
        match condition {
            Condition::Tags { values, .. } => assert_eq!(values, tags(&["CS2101", "CS2103"])),
            other => panic!("unexpected condition {other:?}"),
        }
    }

    #[test]
    fn test_invalid_list_item_spans_item() {
        // t:"ok,b@d" with the quoted phrase at 2..10
        let err = compile_unit(
            spanned(FilterKey::Tag, 0),
            spanned(FilterOperator::Convenience, 1),
            Lexeme {
                text: "ok,b@d",
                span: Span::new(2, 10),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTestPhrase);
        assert_eq!(err.span(), Some(Span::new(6, 9)));
    }

    #[test]
    fn test_unterminated_quote_in_list() {
        let err = compile_unit(
            spanned(FilterKey::Attachment, 0),
            spanned(FilterOperator::Convenience, 1),
            Lexeme {
                text: "a.txt,'b.txt",
                span: Span::new(2, 16),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTestPhrase);
        assert_eq!(err.cause().map(FilterError::kind), Some(ErrorKind::MissingEndQuote));
        assert_eq!(err.span(), Some(Span::new(9, 15)));
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = compile_unit(
            spanned(FilterKey::Tag, 0),
            spanned(FilterOperator::Equal, 1),
            Lexeme {
                text: " , ",
                span: Span::new(2, 7),
            },
        );
        // " " between commas is a token that fails tag parsing
        assert_eq!(err.unwrap_err().kind(), ErrorKind::InvalidTestPhrase);

        let err = compile_unit(
            spanned(FilterKey::Tag, 0),
            spanned(FilterOperator::Equal, 1),
            Lexeme {
                text: "",
                span: Span::new(2, 4),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTestPhrase);
        assert_eq!(err.span(), Some(Span::new(2, 4)));
    }

    #[test]
    fn test_set_unit_rejects_scalar_key() {
        let err = compile_set_unit(
            spanned(FilterKey::Name, 0),
            spanned(FilterOperator::Less, 1),
            spanned(FilterOperator::Convenience, 2),
            lexeme("x", 3),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSetKey);
        assert_eq!(err.span(), Some(Span::new(0, 1)));
    }

    #[test]
    fn test_set_unit_field_operator_does_not_change_result() {
        let compile = |field_op| {
            compile_set_unit(
                spanned(FilterKey::Tag, 0),
                spanned(FilterOperator::Greater, 1),
                spanned(field_op, 2),
                lexeme("CS2103", 3),
            )
            .unwrap()
        };
        let expected = Condition::Tags {
            relation: SetRelation::Superset,
            values: tags(&["CS2103"]),
        };
        for field_op in [
            FilterOperator::Convenience,
            FilterOperator::Equal,
            FilterOperator::Less,
            FilterOperator::Greater,
        ] {
            assert_eq!(compile(field_op), expected, "{field_op}");
        }
    }

    #[test]
    fn test_attachment_field_operator_accepted() {
        let condition = compile_set_unit(
            spanned(FilterKey::Attachment, 0),
            spanned(FilterOperator::Equal, 1),
            spanned(FilterOperator::Greater, 2),
            lexeme("x.txt", 3),
        )
        .unwrap();
        assert_eq!(
            condition,
            Condition::Attachments {
                relation: SetRelation::Equal,
                values: ["x.txt".parse().unwrap()].into_iter().collect(),
            }
        );
    }

    #[test]
    fn test_bare_phrase_skips_numeric_fields() {
        let filter = compile_bare_phrase(lexeme("3", 0));
        // "3" is not a deadline, and priority is never tried.
        let expected = Filter::any([
            Condition::Name {
                comparison: Comparison::Equal,
                value: "3".parse().unwrap(),
            },
            Condition::Tags {
                relation: SetRelation::Superset,
                    values: tags(&["3"]),
            },
            Condition::Attachments {
                relation: SetRelation::Superset,
                values: ["3".parse().unwrap()].into_iter().collect(),
            },
        ]);
        assert_eq!(filter, expected);
    }

    #[test]
    fn test_bare_phrase_date() {
        let filter = compile_bare_phrase(lexeme("1/10/2018", 0));
        let Filter::Or(left, _) = &filter else {
            panic!("expected an or-chain");
        };
        assert!(matches!(
            **left,
            Filter::Or(_, ref deadline) if matches!(
                **deadline,
                Filter::Condition(Condition::Deadline {
                    comparison: Comparison::AtMost,
                    ..
                })
            )
        ));
    }

    #[test]
    fn test_bare_phrase_valid_for_nothing() {
        let filter = compile_bare_phrase(Lexeme {
            text: "",
            span: Span::new(0, 2),
        });
        assert_eq!(filter, Filter::Never);
    }
}
