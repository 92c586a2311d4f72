//! Publish every file changed by a pull request.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::remote::GithubClient;
use crate::tools::{ToolInvocation, ToolRunner};

/// How many publish runs succeeded or failed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub published: usize,
    pub failed: usize,
}

/// Run the publish command once per changed file of `pr`, in order.
///
/// Failing publish runs are logged and skipped over. Only fetching the file
/// list can fail the whole run.
pub async fn run(
    config: &Config,
    pr: &str,
    github: &dyn GithubClient,
    tools: &dyn ToolRunner,
) -> Result<PublishSummary, Error> {
    let publish = ToolInvocation::from_command(&config.tools.publish)?;
    let files = github.pr_files(pr).await?;
    info!(pr, files = files.len(), "Fetched changed files");

    let mut summary = PublishSummary::default();
    for file in &files {
        println!("Publish {}", file.filename);

        let invocation = publish.clone().arg(&file.filename);
        match tools.run(&invocation) {
            Ok(exit) if exit.success() => summary.published += 1,
            Ok(exit) => {
                warn!(file = %file.filename, code = ?exit.code, "Publish exited with failure");
                summary.failed += 1;
            }
            Err(e) => {
                warn!(file = %file.filename, error = %e, "Failed to run publish");
                summary.failed += 1;
            }
        }
    }

    info!(
        published = summary.published,
        failed = summary.failed,
        "Publish complete"
    );
    Ok(summary)
}
