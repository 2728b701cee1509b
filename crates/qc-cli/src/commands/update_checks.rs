use anyhow::bail;
use qc_checks::CheckCatalog;
use qc_config::EngineConfig;
use qc_core::checks::CheckNames;
use qc_core::scope::{MAX_SCOPE_IDS, Scope};
use qc_db::registry::CatalogRegistry;
use qc_engine::{BatchCoordinator, RunRequest};
use tokio_util::sync::CancellationToken;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UpdateChecksArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `qc update-checks`.
///
/// On a fatal error the progress reached so far is printed before the error
/// is returned.
pub async fn handle(
    args: &UpdateChecksArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let registry = CatalogRegistry::new(&ctx.service, CheckCatalog::builtin());
    let engine = &ctx.config.engine;
    let request = build_request(args, &registry.catalog().known_check_names(), engine)?;

    let coordinator = BatchCoordinator::new(&registry, &ctx.service, &ctx.service, &ctx.service)
        .with_threshold(engine.checkable_threshold)
        .with_page_size(engine.page_size)
        .with_cancellation(cancel);

    match coordinator.run(request).await {
        Ok(summary) => output(&summary, flags.format),
        Err(err) => {
            output(&err.progress, flags.format)?;
            Err(err.into())
        }
    }
}

fn build_request(
    args: &UpdateChecksArgs,
    known: &CheckNames,
    engine: &EngineConfig,
) -> anyhow::Result<RunRequest> {
    let unknown: Vec<&str> = args
        .check
        .iter()
        .filter(|name| !known.contains(*name))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("unknown check name(s): {}", unknown.join(", "));
    }

    let mut scope = Scope::all();
    scope.translation_project = args.project;
    if !args.store.is_empty() {
        scope = scope.with_stores(args.store.iter().copied());
    }
    if !args.unit.is_empty() {
        scope = scope.with_units(args.unit.iter().copied());
    }

    if scope.exceeds_id_limit() {
        bail!("at most {MAX_SCOPE_IDS} --store and {MAX_SCOPE_IDS} --unit ids per run");
    }

    Ok(RunRequest {
        check_names: (!args.check.is_empty()).then(|| args.check.iter().cloned().collect()),
        scope,
        keep_false_positives: engine.keep_false_positives && !args.unmute,
    })
}
