use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `qc` binary.
#[derive(Debug, Parser)]
#[command(name = "qc", version, about = "Translation quality check reconciliation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (overrides `database.path` from config)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::root_commands::SchemaType;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["qc", "--format", "table", "--verbose", "check-names"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::CheckNames));
    }

    #[test]
    fn update_checks_collects_repeated_filters() {
        let cli = Cli::try_parse_from([
            "qc",
            "update-checks",
            "--check",
            "printf",
            "--check",
            "tabs",
            "--store",
            "3",
            "--store",
            "4",
            "--unmute",
            "--db",
            ":memory:",
        ])
        .expect("cli should parse");

        let Commands::UpdateChecks(args) = cli.command else {
            panic!("expected update-checks");
        };
        assert_eq!(args.check, vec!["printf".to_string(), "tabs".to_string()]);
        assert_eq!(args.store, vec![3, 4]);
        assert!(args.unit.is_empty());
        assert_eq!(args.project, None);
        assert!(args.unmute);
        assert_eq!(cli.db.as_deref(), Some(":memory:"));
    }

    #[test]
    fn mute_requires_unit_and_check() {
        assert!(Cli::try_parse_from(["qc", "mute", "--unit", "1"]).is_err());
        let cli = Cli::try_parse_from(["qc", "mute", "--unit", "1", "--check", "tabs", "--undo"])
            .expect("cli should parse");
        let Commands::Mute(args) = cli.command else {
            panic!("expected mute");
        };
        assert!(args.undo);
    }

    #[test]
    fn schema_type_is_a_value_enum() {
        let cli = Cli::try_parse_from(["qc", "schema", "run-summary"]).expect("cli should parse");
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema");
        };
        assert_eq!(args.type_name, SchemaType::RunSummary);
        assert!(Cli::try_parse_from(["qc", "schema", "nope"]).is_err());
    }
}
