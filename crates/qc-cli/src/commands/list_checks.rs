use anyhow::Context;
use qc_core::responses::UnitChecksResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListChecksArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `qc list-checks`.
pub async fn handle(
    args: &ListChecksArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.service
        .get_unit(args.unit)
        .await
        .with_context(|| format!("unit {} not found", args.unit))?;
    let checks = ctx.service.list_unit_checks(args.unit).await?;
    output(
        &UnitChecksResponse {
            unit_id: args.unit,
            checks,
        },
        flags.format,
    )
}
