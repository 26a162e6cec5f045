//! Output formatting utilities for the tb CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//!
//! - [`tasks`] - Task list output (find)
//! - [`diagnostics`] - Filter error rendering
//! - [`helpers`] - Common formatting utilities (truncation, priority, deadlines)

mod diagnostics;
pub mod helpers;
mod tasks;

pub use diagnostics::{format_error_json, format_filter_diagnostic};
pub use tasks::{format_count_json, format_tasks_json, format_tasks_table};
