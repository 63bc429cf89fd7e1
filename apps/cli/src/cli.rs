//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fast_downloader::config::{DEFAULT_BATCH_SIZE, DEFAULT_LINKS_FILE};

/// Turn a Wabbajack modlist into Nexus Mods links and open them in batches.
#[derive(Parser, Debug)]
#[command(name = "fast-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// File the link list is stored in
    #[arg(long, env = "FASTDL_LINKS_FILE", default_value = DEFAULT_LINKS_FILE, global = true)]
    pub links: PathBuf,

    /// Links opened per batch
    #[arg(short = 'b', long, env = "FASTDL_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..), global = true)]
    pub batch_size: u16,

    /// Pause between two opens in one batch, in milliseconds
    #[arg(long, env = "FASTDL_OPEN_DELAY_MS", default_value_t = 500, value_parser = clap::value_parser!(u64).range(0..=60000), global = true)]
    pub delay_ms: u64,

    /// Print results as JSON instead of progress lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Extract Nexus links from a .wabbajack file or modlist JSON into the link list
    Extract {
        /// Path to the .wabbajack archive or extracted modlist file
        path: PathBuf,

        /// Replace an existing link list without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Show how many links and batches the stored list holds
    Status,
    /// Open the stored links one batch at a time
    Open {
        /// Open every batch without waiting for Enter in between
        #[arg(long)]
        no_wait: bool,

        /// Print the links instead of opening a browser
        #[arg(long)]
        dry_run: bool,
    },
}
