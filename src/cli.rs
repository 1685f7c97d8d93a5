use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::SnapshotSelector;

/// Track release candidates across repositories, test them, and tag promoted versions
#[derive(Parser, Debug)]
#[command(name = "rc-tracker")]
#[command(version)]
#[command(
    about = "Track release candidates across repositories, test them, and tag promoted versions",
    long_about = None
)]
pub struct Args {
    /// Path to a config file (defaults to ./rc-tracker.config.yml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Snapshot log file
    #[arg(
        short,
        long,
        global = true,
        env = "RELEASE_CANDIDATES_FILE",
        value_name = "PATH"
    )]
    pub file: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the current candidate of every tracked repository and record a snapshot
    Scan(ScanArgs),
    /// Run the functional tests against the pending snapshot and record the verdict
    Test(TestArgs),
    /// Ensure every component repository carries a tag for each named version
    Tag(TagArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ScanArgs {
    /// Number of repositories resolved in parallel
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,
}

#[derive(ClapArgs, Debug)]
pub struct TestArgs {
    /// Print the environment and command without running tests or touching the log
    #[arg(long)]
    pub dry_run: bool,

    /// Test this snapshot (its generated_at value) instead of the pending one
    #[arg(long, value_name = "ID", conflicts_with = "snapshot_index")]
    pub snapshot_id: Option<String>,

    /// Test the snapshot at this position, 0 being the newest
    #[arg(long, value_name = "N")]
    pub snapshot_index: Option<usize>,
}

impl TestArgs {
    pub fn selector(&self) -> SnapshotSelector {
        match (&self.snapshot_id, self.snapshot_index) {
            (Some(id), _) => SnapshotSelector::Id(id.clone()),
            (None, Some(index)) => SnapshotSelector::Index(index),
            (None, None) => SnapshotSelector::Pending,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct TagArgs {
    /// Named versions file
    #[arg(long, value_name = "PATH")]
    pub versions_file: Option<PathBuf>,

    /// Reconcile only this version
    #[arg(long, value_name = "NAME")]
    pub version: Option<String>,

    /// Report missing tags without creating them
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
