//! Compiled filter expressions.
//!
//! A [`Filter`] is what the parser produces: a tree of typed leaf
//! [`Condition`]s joined by boolean operators. Every comparison value has
//! already been parsed into its field type, so evaluating a filter never fails.

use std::collections::BTreeSet;
use std::mem;

use taskbook_model_rs::models::{Attachment, Deadline, Frequency, Name, Priority, Tag};

/// How a scalar task value is compared with the test value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Task value equals the test value. For names: contains it, ignoring case.
    Equal,
    /// Task value orders at or before the test value.
    AtMost,
    /// Task value orders at or after the test value.
    AtLeast,
}

/// How a task's set of values relates to the test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetRelation {
    /// The sets are equal.
    Equal,
    /// Every task value is in the test set.
    Subset,
    /// Every test value is in the task's set.
    Superset,
}

/// A single typed test against one task field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Compares the task name.
    Name {
        /// How to compare.
        comparison: Comparison,
        /// The test value.
        value: Name,
    },
    /// Compares the task deadline. Tasks without a deadline never match.
    Deadline {
        /// How to compare.
        comparison: Comparison,
        /// The test value.
        value: Deadline,
    },
    /// Compares the task priority.
    Priority {
        /// How to compare.
        comparison: Comparison,
        /// The test value.
        value: Priority,
    },
    /// Compares the task frequency.
    Frequency {
        /// How to compare.
        comparison: Comparison,
        /// The test value.
        value: Frequency,
    },
    /// Relates the task tag set to a test set.
    Tags {
        /// How the sets must relate.
        relation: SetRelation,
        /// The test set.
        values: BTreeSet<Tag>,
    },
    /// Relates the task attachment set to a test set.
    Attachments {
        /// How the sets must relate.
        relation: SetRelation,
        /// The test set.
        values: BTreeSet<Attachment>,
    },
}

/// Represents a compiled filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// A leaf test.
    Condition(Condition),

    /// Matches nothing. Produced by a bare phrase that is valid for no field.
    Never,

    // ==================== Boolean Operators ====================
    /// Logical AND of two filters.
    And(Box<Filter>, Box<Filter>),

    /// Logical OR of two filters.
    Or(Box<Filter>, Box<Filter>),

    /// Logical NOT of a filter.
    Not(Box<Filter>),
}

impl Filter {
    /// Creates an AND filter from two filters.
    ///
    /// # Example
    ///
    /// ```
    /// use taskbook_filter_rs::filter::Filter;
    ///
    /// let filter = Filter::and(Filter::Never, Filter::Never);
    /// assert!(matches!(filter, Filter::And(_, _)));
    /// ```
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR filter from two filters.
    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Or(Box::new(left), Box::new(right))
    }

    /// Creates a NOT filter from another filter.
    pub fn negate(inner: Filter) -> Self {
        Filter::Not(Box::new(inner))
    }

    /// ORs a list of conditions together, left to right.
    ///
    /// An empty list yields [`Filter::Never`].
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        conditions
            .into_iter()
            .map(Filter::Condition)
            .reduce(Filter::or)
            .unwrap_or(Filter::Never)
    }
}

impl Drop for Filter {
    fn drop(&mut self) {
        // Unlink children onto a heap stack so that dropping a deep tree does
        // not recurse once per level.
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut filter) = pending.pop() {
            detach_children(&mut filter, &mut pending);
        }
    }
}

fn detach_children(filter: &mut Filter, pending: &mut Vec<Filter>) {
    match filter {
        Filter::And(left, right) | Filter::Or(left, right) => {
            pending.push(mem::replace(&mut **left, Filter::Never));
            pending.push(mem::replace(&mut **right, Filter::Never));
        }
        Filter::Not(inner) => pending.push(mem::replace(&mut **inner, Filter::Never)),
        Filter::Condition(_) | Filter::Never => {}
    }
}

impl From<Condition> for Filter {
    fn from(condition: Condition) -> Self {
        Filter::Condition(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_condition(value: &str) -> Condition {
        Condition::Name {
            comparison: Comparison::Equal,
            value: value.parse().unwrap(),
        }
    }

    #[test]
    fn test_any_empty_is_never() {
        assert_eq!(Filter::any(Vec::new()), Filter::Never);
    }

    #[test]
    fn test_any_single_is_leaf() {
        assert_eq!(
            Filter::any([name_condition("a")]),
            Filter::Condition(name_condition("a"))
        );
    }

    #[test]
    fn test_any_chains_left_to_right() {
        let filter = Filter::any([name_condition("a"), name_condition("b"), name_condition("c")]);
        let expected = Filter::or(
            Filter::or(name_condition("a").into(), name_condition("b").into()),
            name_condition("c").into(),
        );
        assert_eq!(filter, expected);
    }
}
