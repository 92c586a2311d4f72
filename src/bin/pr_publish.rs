//! pr-publish - run the publish script for every file changed by a PR.

use docsync::cli::{self, PublishArgs, PUBLISH_USAGE};
use docsync::config::Config;
use docsync::remote::RealGithubClient;
use docsync::tools::SystemRunner;

#[tokio::main]
async fn main() {
    docsync::logging::init();

    let args: PublishArgs = cli::parse_or_exit(PUBLISH_USAGE);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let github = RealGithubClient::new(config.clone());
    if let Err(e) = cli::publish::run(&config, &args.pr, &github, &SystemRunner).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
