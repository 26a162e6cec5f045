//! Filter evaluation against tasks.
//!
//! This module provides the [`FilterEvaluator`] for evaluating compiled filter
//! expressions against [`Task`]s. Evaluation is total: every test value was
//! parsed when the filter was compiled.
//!
//! # Example
//!
//! ```
//! use taskbook_filter_rs::filter::{FilterEvaluator, FilterParser};
//! use taskbook_model_rs::models::Task;
//!
//! let filter = FilterParser::parse("n:Hello && p>1").unwrap();
//! let evaluator = FilterEvaluator::new(&filter);
//!
//! let task = Task::new("Hello World".parse().unwrap()).with_priority("2".parse().unwrap());
//! assert!(evaluator.matches(&task));
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;

use taskbook_model_rs::models::Task;

use super::ast::{Comparison, Condition, Filter, SetRelation};

impl Filter {
    /// Returns true if the task satisfies this filter.
    pub fn matches(&self, task: &Task) -> bool {
        // Walks the tree with an explicit stack so that deeply nested input
        // cannot exhaust the thread stack.
        let mut steps = vec![Step::Visit(self)];
        let mut result = false;

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(filter) => match filter {
                    Filter::Condition(condition) => result = condition.matches(task),
                    Filter::Never => result = false,
                    Filter::And(left, right) => {
                        steps.push(Step::AndThen(right));
                        steps.push(Step::Visit(left));
                    }
                    Filter::Or(left, right) => {
                        steps.push(Step::OrThen(right));
                        steps.push(Step::Visit(left));
                    }
                    Filter::Not(inner) => {
                        steps.push(Step::Negate);
                        steps.push(Step::Visit(inner));
                    }
                },
                // Short-circuit: the right side only runs when it can change the result.
                Step::AndThen(right) if result => steps.push(Step::Visit(right)),
                Step::OrThen(right) if !result => steps.push(Step::Visit(right)),
                Step::AndThen(_) | Step::OrThen(_) => {}
                Step::Negate => result = !result,
            }
        }

        result
    }
}

/// Pending work while evaluating a filter tree.
enum Step<'f> {
    Visit(&'f Filter),
    AndThen(&'f Filter),
    OrThen(&'f Filter),
    Negate,
}

impl Condition {
    /// Returns true if the task field passes this test.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Condition::Name { comparison, value } => match comparison {
                Comparison::Equal => task.name.contains_ignore_case(value),
                _ => compare(*comparison, task.name.cmp_ignore_case(value)),
            },
            // Tasks without a deadline never match a deadline test.
            Condition::Deadline { comparison, value } => task
                .deadline
                .as_ref()
                .is_some_and(|deadline| compare(*comparison, deadline.cmp(value))),
            Condition::Priority { comparison, value } => {
                compare(*comparison, task.priority.cmp(value))
            }
            Condition::Frequency { comparison, value } => {
                compare(*comparison, task.frequency.cmp(value))
            }
            Condition::Tags { relation, values } => relate(*relation, &task.tags, values),
            Condition::Attachments { relation, values } => {
                relate(*relation, &task.attachments, values)
            }
        }
    }
}

/// Applies a comparison to the ordering of the task value against the test value.
fn compare(comparison: Comparison, ordering: Ordering) -> bool {
    match comparison {
        Comparison::Equal => ordering == Ordering::Equal,
        Comparison::AtMost => ordering != Ordering::Greater,
        Comparison::AtLeast => ordering != Ordering::Less,
    }
}

fn relate<T: Ord>(relation: SetRelation, task: &BTreeSet<T>, test: &BTreeSet<T>) -> bool {
    match relation {
        SetRelation::Equal => task == test,
        SetRelation::Subset => task.is_subset(test),
        SetRelation::Superset => task.is_superset(test),
    }
}

/// Evaluates a compiled filter against tasks.
///
/// The evaluator borrows a [`Filter`] and can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    filter: &'a Filter,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(filter: &'a Filter) -> Self {
        Self { filter }
    }

    /// Returns true if the task matches the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.filter.matches(task)
    }

    /// Filters a slice of tasks, returning only those that match, in order.
    pub fn filter_tasks<'b>(&self, tasks: &'b [Task]) -> Vec<&'b Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    /// Counts the tasks that match.
    pub fn count(&self, tasks: &[Task]) -> usize {
        tasks.iter().filter(|task| self.matches(task)).count()
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
