use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Reconcile persisted quality checks with current check results.
    UpdateChecks(UpdateChecksArgs),
    /// List the persisted checks of a unit.
    ListChecks(ListChecksArgs),
    /// Mark a check as a false positive (or clear the mark with --undo).
    Mute(MuteArgs),
    /// Show (and recompute if stale) check statistics of a store.
    Stats(StatsArgs),
    /// List every check the built-in suites know.
    CheckNames,
    /// Print the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct UpdateChecksArgs {
    /// Only evaluate (and touch rows of) this check; repeatable.
    #[arg(long)]
    pub check: Vec<String>,

    /// Restrict to one translation project.
    #[arg(long)]
    pub project: Option<i64>,

    /// Restrict to a store; repeatable.
    #[arg(long)]
    pub store: Vec<i64>,

    /// Restrict to a unit; repeatable.
    #[arg(long)]
    pub unit: Vec<i64>,

    /// Unmute muted checks that still fail.
    #[arg(long)]
    pub unmute: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ListChecksArgs {
    #[arg(long)]
    pub unit: i64,
}

#[derive(Clone, Debug, Args)]
pub struct MuteArgs {
    #[arg(long)]
    pub unit: i64,

    #[arg(long)]
    pub check: String,

    /// Unmute instead.
    #[arg(long)]
    pub undo: bool,
}

#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub store: i64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    RunSummary,
    UnitChecks,
    StoreStats,
    CheckInfo,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Response type to describe.
    pub type_name: SchemaType,
}
