//! Command-line surfaces of the two docsync binaries.

pub mod publish;
pub mod sync;

#[cfg(test)]
pub(crate) mod fakes;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

/// Printed when `pr-publish` gets the wrong number of arguments.
pub const PUBLISH_USAGE: &str = "You must provide the PR number!";

/// Printed when `topic-sync` gets the wrong number of arguments.
pub const SYNC_USAGE: &str = "You must provide one file name!";

/// Publish every file changed by a dqlite-docs pull request
#[derive(Parser, Debug)]
#[command(name = "pr-publish")]
#[command(version, about, long_about = None)]
pub struct PublishArgs {
    /// Pull request number
    pub pr: String,
}

/// Diff a docs file against its Discourse topic and open discedit on it
#[derive(Parser, Debug)]
#[command(name = "topic-sync")]
#[command(version, about, long_about = None)]
pub struct SyncArgs {
    /// Local Markdown file, as listed in the navigation table
    pub filename: String,

    /// Index file with the navigation table (default: index.md).
    /// The index itself is still looked up by its file name
    #[arg(long)]
    pub index: Option<PathBuf>,
}

/// Parse arguments, replacing clap's usage errors with `usage` and exit code 1.
pub fn parse_or_exit<T: Parser>(usage: &str) -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            tracing::debug!(error = %e, "Invalid arguments");
            println!("{usage}");
            std::process::exit(1);
        }
    }
}
