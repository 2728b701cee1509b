use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MuteArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `qc mute`.
///
/// The store's cached statistics count muted checks separately, so they are
/// invalidated too.
pub async fn handle(args: &MuteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let unit = ctx
        .service
        .get_unit(args.unit)
        .await
        .with_context(|| format!("unit {} not found", args.unit))?;
    let check = ctx
        .service
        .set_false_positive(args.unit, &args.check, !args.undo)
        .await
        .with_context(|| format!("unit {} has no '{}' check", args.unit, args.check))?;
    ctx.service.invalidate_store_stats(unit.store_id).await?;
    tracing::info!(
        unit_id = unit.id,
        check = %check.name,
        muted = check.false_positive,
        "check updated"
    );
    output(&check, flags.format)
}
