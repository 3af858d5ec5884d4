//! verify command - Check a database's metadata for problems

use anyhow::{bail, Result};

use super::database_arg;
use crate::engine::{runner, Context};
use crate::ui::output;

/// Verify the commit history and branches of a database.
///
/// Warnings are printed but do not fail the command; any structural
/// error does.
pub fn verify(ctx: &Context, database: &str) -> Result<()> {
    let db = database_arg(database)?;
    let store = ctx.open_store()?;
    let verbosity = ctx.verbosity();

    let report = runner::verify_database(&store, &db, verbosity)?;

    for finding in report.warnings() {
        output::warn(finding, verbosity);
    }

    let errors: Vec<_> = report.errors().collect();
    if !errors.is_empty() {
        for finding in &errors {
            output::error(finding);
        }
        bail!("{} problem(s) found in '{}'", errors.len(), db);
    }

    output::success(format!("Metadata for '{}' is consistent", db), verbosity);
    Ok(())
}
