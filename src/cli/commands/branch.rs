//! branch commands - Create, list and recount branches

use anyhow::{Context as _, Result};

use super::database_arg;
use crate::engine::{runner, Context, CreateBranchRequest};
use crate::ui::output;

/// Create a branch pointing at an existing commit.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `database` - Database the branch belongs to
/// * `branch` - Name of the new branch (empty is rejected by the engine)
/// * `commit` - Target commit id (empty is rejected by the engine)
/// * `description` - Free text, may be empty
pub fn create(
    ctx: &Context,
    database: &str,
    branch: &str,
    commit: &str,
    description: &str,
) -> Result<()> {
    let db = database_arg(database)?;
    let store = ctx.open_store()?;

    let request = CreateBranchRequest {
        branch: branch.to_string(),
        commit: commit.to_string(),
        description: description.to_string(),
    };
    runner::create_branch(&store, &db, &request, ctx.run_options())?;

    output::success(format!("Branch '{}' created", branch), ctx.verbosity());
    Ok(())
}

/// List the branches of a database.
pub fn list(ctx: &Context, database: &str) -> Result<()> {
    let db = database_arg(database)?;
    let store = ctx.open_store()?;
    let verbosity = ctx.verbosity();

    let meta = runner::load(&store, &db, verbosity)?;
    if meta.branches.is_empty() {
        output::debug(format!("No branches in {}", db), verbosity);
    }
    for (name, entry) in &meta.branches {
        output::print(output::format_branch(name.as_str(), entry), verbosity);
    }
    Ok(())
}

/// Refresh a branch's cached commit count.
pub fn recount(ctx: &Context, database: &str, branch: &str) -> Result<()> {
    let db = database_arg(database)?;
    let store = ctx.open_store()?;

    let (previous, fresh) = runner::recount_branch(&store, &db, branch, ctx.run_options())
        .with_context(|| format!("Failed to recount branch '{}'", branch))?;

    if previous == fresh {
        output::success(
            format!("Branch '{}' already has {} commits", branch, fresh),
            ctx.verbosity(),
        );
    } else {
        output::success(
            format!(
                "Branch '{}' commit count updated from {} to {}",
                branch, previous, fresh
            ),
            ctx.verbosity(),
        );
    }
    Ok(())
}
