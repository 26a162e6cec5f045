//! Operator-precedence parser for filter expressions.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::ast::Filter;
use super::error::{ErrorKind, FilterError, FilterResult, Span};
use super::operand;
use super::tokenizer::Tokenizer;

/// Boolean operator tokens: `&&`/`&`, `||`/`|`, `!`, `(` and `)`.
static OPERATOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<and>&&?)|(?P<or>\|\|?)|(?P<not>!)|(?P<left>\()|(?P<right>\)))")
        .expect("operator pattern is valid")
});

/// Predicate over characters that an operand reader must leave alone.
pub type ReservedChars = fn(char) -> bool;

/// Returns true for the characters that make up boolean operators.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '&' | '|' | '!' | '(' | ')')
}

/// A value the expression parser can combine with boolean operators.
pub trait BooleanOperand: Sized {
    /// Combines two operands with logical AND.
    fn and(self, rhs: Self) -> Self;

    /// Combines two operands with logical OR.
    fn or(self, rhs: Self) -> Self;

    /// Negates an operand.
    fn negate(self) -> Self;
}

impl BooleanOperand for Filter {
    fn and(self, rhs: Self) -> Self {
        Filter::and(self, rhs)
    }

    fn or(self, rhs: Self) -> Self {
        Filter::or(self, rhs)
    }

    fn negate(self) -> Self {
        Filter::negate(self)
    }
}

impl BooleanOperand for bool {
    fn and(self, rhs: Self) -> Self {
        self && rhs
    }

    fn or(self, rhs: Self) -> Self {
        self || rhs
    }

    fn negate(self) -> Self {
        !self
    }
}

/// A boolean operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `(`
    LeftBracket,
    /// `)`
    RightBracket,
    /// `&&` or `&`
    And,
    /// `||` or `|`
    Or,
    /// `!`
    Not,
}

impl Operator {
    /// Returns the binding rank of the operator; lower binds tighter.
    ///
    /// Brackets have no precedence: they only mark positions on the stack.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Operator::Not => Some(1),
            Operator::And => Some(2),
            Operator::Or => Some(3),
            Operator::LeftBracket | Operator::RightBracket => None,
        }
    }

    /// Pops this operator's operands and pushes the combined result.
    fn apply<T: BooleanOperand>(&self, operands: &mut Vec<T>) -> FilterResult<()> {
        let result = match self {
            Operator::Not => pop_operand(operands)?.negate(),
            Operator::And => {
                let rhs = pop_operand(operands)?;
                pop_operand(operands)?.and(rhs)
            }
            Operator::Or => {
                let rhs = pop_operand(operands)?;
                pop_operand(operands)?.or(rhs)
            }
            Operator::LeftBracket | Operator::RightBracket => return Ok(()),
        };
        operands.push(result);
        Ok(())
    }
}

fn pop_operand<T>(operands: &mut Vec<T>) -> FilterResult<T> {
    operands
        .pop()
        .ok_or_else(FilterError::unexpected_end_of_string)
}

/// Reads the boolean operator at the cursor, if there is one.
fn read_operator(tokenizer: &mut Tokenizer<'_>) -> Option<(Operator, Span)> {
    let matched = tokenizer.try_next_matcher(&OPERATOR_PATTERN)?;
    let operator = [
        ("and", Operator::And),
        ("or", Operator::Or),
        ("not", Operator::Not),
        ("left", Operator::LeftBracket),
        ("right", Operator::RightBracket),
    ]
    .into_iter()
    .find(|(group, _)| matched.group(group).is_some())
    .map(|(_, operator)| operator)?;
    Some((operator, matched.span()))
}

/// Shunting-yard parser over any [`BooleanOperand`].
///
/// Operands are produced by a caller-supplied reader, so the same engine can
/// build compiled filters, plain booleans, or anything else with AND, OR and
/// NOT. Two operands with no operator between them are joined with AND.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `!` (NOT) - unary prefix
/// 2. `&&` (AND) - binary, left-associative
/// 3. `||` (OR) - binary, left-associative
#[derive(Debug)]
pub struct ExpressionParser<T> {
    operators: Vec<(Operator, Span)>,
    operands: Vec<T>,
    expecting_operand: bool,
}

impl<T: BooleanOperand> Default for ExpressionParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BooleanOperand> ExpressionParser<T> {
    /// Creates a parser with empty stacks.
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
            operands: Vec::new(),
            expecting_operand: true,
        }
    }

    /// Parses the whole remaining input of `tokenizer` into one operand.
    ///
    /// `read_operand` is called whenever an operand is expected and no operator
    /// starts at the cursor. It receives the characters it must not consume.
    ///
    /// # Errors
    ///
    /// - `UnexpectedBinaryOperator` for `&&`/`||` where an operand is expected.
    /// - `UnexpectedRightBracket` for `)` where an operand is expected.
    /// - `MismatchedRightBracket` for `)` without a matching `(`.
    /// - `MismatchedLeftBracket` for `(` that is never closed.
    /// - `UnexpectedEndOfString` if the input ends where an operand is expected.
    /// - Any error returned by `read_operand`.
    pub fn parse<'a, F>(mut self, tokenizer: &mut Tokenizer<'a>, mut read_operand: F) -> FilterResult<T>
    where
        F: FnMut(&mut Tokenizer<'a>, ReservedChars) -> FilterResult<T>,
    {
        while tokenizer.has_next_token() {
            match read_operator(tokenizer) {
                Some((operator, span)) => self.accept_operator(operator, span)?,
                None => {
                    if !self.expecting_operand {
                        self.insert_implicit_and(tokenizer.location())?;
                    }
                    let operand = read_operand(tokenizer, is_operator_char)?;
                    self.operands.push(operand);
                    self.expecting_operand = false;
                }
            }
        }

        if self.expecting_operand {
            return Err(FilterError::unexpected_end_of_string());
        }

        while let Some((operator, span)) = self.operators.pop() {
            if operator == Operator::LeftBracket {
                return Err(FilterError::new(
                    ErrorKind::MismatchedLeftBracket,
                    "this bracket is never closed",
                    span,
                ));
            }
            operator.apply(&mut self.operands)?;
        }

        let result = pop_operand(&mut self.operands)?;
        if !self.operands.is_empty() {
            return Err(FilterError::unexpected_end_of_string());
        }
        Ok(result)
    }

    fn accept_operator(&mut self, operator: Operator, span: Span) -> FilterResult<()> {
        match operator {
            Operator::Not => {
                if !self.expecting_operand {
                    self.insert_implicit_and(span.start)?;
                }
                self.operators.push((operator, span));
                self.expecting_operand = true;
            }
            Operator::And | Operator::Or => {
                if self.expecting_operand {
                    return Err(FilterError::new(
                        ErrorKind::UnexpectedBinaryOperator,
                        "expected a filter before this operator",
                        span,
                    ));
                }
                self.push_binary(operator, span)?;
                self.expecting_operand = true;
            }
            Operator::LeftBracket => {
                if !self.expecting_operand {
                    self.insert_implicit_and(span.start)?;
                }
                self.operators.push((operator, span));
                self.expecting_operand = true;
            }
            Operator::RightBracket => {
                if self.expecting_operand {
                    return Err(FilterError::new(
                        ErrorKind::UnexpectedRightBracket,
                        "expected a filter before this bracket",
                        span,
                    ));
                }
                loop {
                    match self.operators.pop() {
                        Some((Operator::LeftBracket, _)) => break,
                        Some((stacked, _)) => stacked.apply(&mut self.operands)?,
                        None => {
                            return Err(FilterError::new(
                                ErrorKind::MismatchedRightBracket,
                                "this bracket was never opened",
                                span,
                            ))
                        }
                    }
                }
                self.expecting_operand = false;
            }
        }
        Ok(())
    }

    /// Joins the pending operand with the one about to start at `position`.
    fn insert_implicit_and(&mut self, position: usize) -> FilterResult<()> {
        trace!(position, "inserting implicit and");
        self.push_binary(Operator::And, Span::point(position))?;
        self.expecting_operand = true;
        Ok(())
    }

    /// Reduces stacked operators that bind at least as tightly, then pushes.
    fn push_binary(&mut self, operator: Operator, span: Span) -> FilterResult<()> {
        let rank = operator.precedence();
        while let Some(&(stacked, _)) = self.operators.last() {
            match (stacked.precedence(), rank) {
                (Some(stacked_rank), Some(rank)) if stacked_rank <= rank => {
                    self.operators.pop();
                    stacked.apply(&mut self.operands)?;
                }
                _ => break,
            }
        }
        self.operators.push((operator, span));
        Ok(())
    }
}

/// Parser for taskbook filter expressions.
///
/// # Grammar
///
/// ```text
/// expression ::= unit | expression ("&&" | "||")? expression
///              | "!" expression | "(" expression ")"
/// unit       ::= key op phrase | key set_op field_op phrase | phrase
/// key        ::= letters, see FilterKey
/// op         ::= ":" | "=" | "<" | ">"
/// phrase     ::= quoted string | [letters digits _ - / \ , .]+
/// ```
///
/// # Example
///
/// ```
/// use taskbook_filter_rs::filter::{Filter, FilterParser};
///
/// let filter = FilterParser::parse("(n:Hello || d:1/10/2018) && t:\"CS2103,CS2101\"").unwrap();
/// assert!(matches!(filter, Filter::And(_, _)));
/// ```
pub struct FilterParser;

impl FilterParser {
    /// Parses a filter expression string into a compiled [`Filter`].
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] describing the first problem found, with the
    /// span of the offending text where there is one.
    pub fn parse(input: &str) -> FilterResult<Filter> {
        debug!(input, "parsing filter expression");
        let mut tokenizer = Tokenizer::new(input);
        let result = ExpressionParser::new().parse(&mut tokenizer, operand::read_operand);
        match &result {
            Ok(_) => debug!(input, "filter expression compiled"),
            Err(e) => debug!(
                input,
                kind = e.kind().code(),
                span = ?e.span(),
                "filter expression rejected"
            ),
        }
        result
    }
}
