//! Check command implementation.
//!
//! Compiles a filter expression without reading any tasks.

use super::{compile, CommandContext, Result};

/// Executes the check command.
///
/// # Errors
///
/// Returns `CommandError::Filter` if the expression does not compile.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    compile(expression)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "valid": true,
            "expression": expression,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("ok");
    }

    Ok(())
}
