use qc_checks::CheckInfo;
use qc_core::responses::{RunSummary, StoreStats, UnitChecksResponse};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::OutputFormat;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `qc schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::RunSummary => schema_for!(RunSummary),
        SchemaType::UnitChecks => schema_for!(UnitChecksResponse),
        SchemaType::StoreStats => schema_for!(StoreStats),
        SchemaType::CheckInfo => schema_for!(Vec<CheckInfo>),
    };
    // A schema is a document, not a table.
    let format = match flags.format {
        OutputFormat::Table => OutputFormat::Json,
        other => other,
    };
    output(&schema, format)
}
