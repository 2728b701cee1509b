use tokio_util::sync::CancellationToken;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command that needs the database.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    match command {
        Commands::UpdateChecks(args) => {
            commands::update_checks::handle(&args, ctx, flags, cancel).await
        }
        Commands::ListChecks(args) => commands::list_checks::handle(&args, ctx, flags).await,
        Commands::Mute(args) => commands::mute::handle(&args, ctx, flags).await,
        Commands::Stats(args) => commands::stats::handle(&args, ctx, flags).await,
        Commands::CheckNames | Commands::Schema(_) => {
            unreachable!("check-names/schema are pre-dispatched in main")
        }
    }
}
