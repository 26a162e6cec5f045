//! Filter expression parser and evaluator for taskbook filter syntax.
//!
//! # Supported Syntax
//!
//! ## Filter Units
//! - `key op phrase` - test one field, e.g. `n:Hello`, `p>1`, `d:1/10/2018`
//! - `key set_op field_op phrase` - test a set field; the field operator is
//!   accepted for every set field but does not change the result, e.g. `t>=CS2103`
//! - `phrase` - test every field that accepts the phrase, e.g. `CS2103`
//!
//! ## Keys
//! - `n`, `name` - task name
//! - `d`, `due`, `deadline` - deadline
//! - `p`, `pri`, `priority` - priority (0 to 4)
//! - `f`, `freq`, `frequency` - recurrence in days
//! - `t`, `tag`, `tags` - tags
//! - `a`, `attach`, `attachment`, `attachments` - attachments
//!
//! ## Operators
//! - `:` - the field's natural comparison: name contains, due on or before,
//!   priority and frequency at least, set contains all of
//! - `=` - equal
//! - `<` - at most, or subset for sets
//! - `>` - at least, or superset for sets
//!
//! ## Phrases
//! Unquoted phrases use letters, digits and `_ - / \ , .`; quote with `'` or
//! `"` for anything else. Set phrases are comma-separated lists.
//!
//! ## Boolean Operators
//! - `&&` or `&` - AND
//! - `||` or `|` - OR
//! - `!` - NOT
//! - `()` - Grouping
//! - juxtaposition - AND
//!
//! # Example
//!
//! ```
//! use taskbook_filter_rs::filter::{FilterEvaluator, FilterParser};
//! use taskbook_model_rs::models::Task;
//!
//! let filter = FilterParser::parse("n:Hello || t:CS2103").unwrap();
//! let evaluator = FilterEvaluator::new(&filter);
//!
//! let tasks: Vec<Task> = vec![];
//! let results = evaluator.filter_tasks(&tasks);
//! assert!(results.is_empty());
//! ```

mod ast;
mod compiler;
mod error;
mod evaluator;
mod key;
mod operand;
mod parser;
mod tokenizer;

pub use ast::{Comparison, Condition, Filter, SetRelation};
pub use compiler::Spanned;
pub use error::{ErrorKind, FilterError, FilterResult, Span};
pub use evaluator::FilterEvaluator;
pub use key::{FilterKey, FilterOperator};
pub use operand::is_phrase_char;
pub use parser::{is_operator_char, BooleanOperand, ExpressionParser, FilterParser, Operator, ReservedChars};
pub use tokenizer::{is_default_quote, CharClass, Lexeme, Matched, Tokenizer};
