//! Find command implementation.
//!
//! Compiles a filter expression and lists the tasks it accepts.

use taskbook_filter_rs::filter::FilterEvaluator;
use taskbook_model_rs::models::Task;
use tracing::debug;

use super::config::Config;
use super::{compile, load_tasks, CommandContext, Result};
use crate::output::{format_count_json, format_tasks_json, format_tasks_table};

/// Options for the find command.
#[derive(Debug)]
pub struct FindOptions {
    /// Filter expression, already joined from the command line words.
    pub expression: String,
    /// Show at most this many tasks.
    pub limit: Option<usize>,
    /// Print only the counts.
    pub count: bool,
}

/// Executes the find command.
///
/// The expression is compiled before the task file is read, so a bad
/// expression is reported even when the file is missing.
///
/// # Errors
///
/// Returns an error if the expression is invalid or the task file cannot be read.
pub fn execute(ctx: &CommandContext, opts: &FindOptions, config: &Config) -> Result<()> {
    let filter = compile(&opts.expression)?;

    let list = load_tasks(ctx, config)?;
    let evaluator = FilterEvaluator::new(&filter);
    let matched = evaluator.filter_tasks(&list.tasks);
    let total = list.tasks.len();
    let matched_count = matched.len();
    debug!(total, matched = matched_count, "filtered tasks");
    if ctx.verbose && !ctx.json_output {
        eprintln!("Matched {matched_count} of {total} tasks");
    }

    if opts.count {
        if ctx.json_output {
            println!("{}", format_count_json(total, matched_count)?);
        } else {
            println!("{matched_count}");
        }
        return Ok(());
    }

    let shown = apply_limit(matched, opts.limit);

    if ctx.json_output {
        println!("{}", format_tasks_json(&shown, total, matched_count)?);
    } else {
        print!("{}", format_tasks_table(&shown, ctx.use_colors));
        if !ctx.quiet && shown.len() < matched_count {
            println!("({} of {} matching tasks shown)", shown.len(), matched_count);
        }
    }

    Ok(())
}

fn apply_limit(tasks: Vec<&Task>, limit: Option<usize>) -> Vec<&Task> {
    match limit {
        Some(limit) => tasks.into_iter().take(limit).collect(),
        None => tasks,
    }
}
