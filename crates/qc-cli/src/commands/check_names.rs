use qc_checks::CheckCatalog;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `qc check-names`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&CheckCatalog::builtin().describe(), flags.format)
}
