use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "vault-duper")]
#[command(about = "Deduplicates password-vault records over the local vault API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Full pipeline: fetch, dedupe, validate, then delete duplicates
    Process {
        /// Skip the confirmation prompt and delete without asking
        #[arg(long)]
        yes: bool,
    },
    /// Fetch and flatten vault items to the export file, no dedup
    Export,
    /// Dedupe a previously exported record file, no API access
    Dedupe {
        /// Record file to read (defaults to the configured export path)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// List vault folders, for picking a folder id
    ListFolders,
    /// Print configuration values
    PrintConfig,
}
