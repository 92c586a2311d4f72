//! topic-sync - diff a docs file against its Discourse topic and edit it.

use docsync::cli::{self, SyncArgs, SYNC_USAGE};
use docsync::config::Config;
use docsync::remote::RealDiscourseClient;
use docsync::tools::SystemRunner;
use docsync::Error;

#[tokio::main]
async fn main() {
    docsync::logging::init();

    let args: SyncArgs = cli::parse_or_exit(SYNC_USAGE);

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(index) = args.index {
        config.index.file = index.to_string_lossy().into_owned();
    }

    let discourse = RealDiscourseClient::new(config.clone());
    match cli::sync::run(&config, &args.filename, &discourse, &SystemRunner).await {
        Ok(_) => {}
        Err(e @ Error::NotInMapping(_)) => {
            println!("{e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
