use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `qc stats`.
pub async fn handle(args: &StatsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = ctx
        .service
        .store_stats(args.store)
        .await
        .with_context(|| format!("store {} not found", args.store))?;
    output(&stats, flags.format)
}
