//! Reconcile one docs file with its Discourse topic.
//!
//! Resolves the file to a topic ID through the index navigation table, shows
//! a `diff` of the live topic against the local file, then opens discedit on
//! the topic with the diff tool as its editor.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::navigation::NavigationMapping;
use crate::remote::DiscourseClient;
use crate::tools::{ToolExit, ToolInvocation, ToolRunner};

/// Exit statuses of the two tools run for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub topic_id: String,
    pub diff: ToolExit,
    pub discedit: ToolExit,
}

/// Run the sync for `filename`, keeping the remote copy in the system temp dir.
pub async fn run(
    config: &Config,
    filename: &str,
    discourse: &dyn DiscourseClient,
    tools: &dyn ToolRunner,
) -> Result<SyncOutcome, Error> {
    run_in(config, filename, discourse, tools, &std::env::temp_dir()).await
}

/// Run the sync for `filename`, keeping the remote copy in `temp_dir`.
pub async fn run_in(
    config: &Config,
    filename: &str,
    discourse: &dyn DiscourseClient,
    tools: &dyn ToolRunner,
    temp_dir: &Path,
) -> Result<SyncOutcome, Error> {
    let topic_id = resolve_topic(config, filename)?;
    info!(filename, topic_id = %topic_id, "Resolved topic");

    let diff = diff_remote(config, filename, &topic_id, discourse, tools, temp_dir).await?;
    let discedit = edit_topic(config, filename, &topic_id, tools)?;

    Ok(SyncOutcome {
        topic_id,
        diff,
        discedit,
    })
}

/// Look `filename` up in the navigation table of the configured index file.
pub fn resolve_topic(config: &Config, filename: &str) -> Result<String, Error> {
    let mapping =
        NavigationMapping::from_file(Path::new(&config.index.file), &config.index.topic_id)?;
    mapping
        .get(filename)
        .map(str::to_string)
        .ok_or_else(|| Error::NotInMapping(filename.to_string()))
}

/// Download the topic into a temporary file and `diff` it against `filename`.
///
/// Discourse drops the final newline of a post, so one is appended. The
/// temporary file is removed before returning, whatever the outcome.
pub async fn diff_remote(
    config: &Config,
    filename: &str,
    topic_id: &str,
    discourse: &dyn DiscourseClient,
    tools: &dyn ToolRunner,
    temp_dir: &Path,
) -> Result<ToolExit, Error> {
    let mut remote_copy = tempfile::Builder::new()
        .prefix("docsync-")
        .suffix(".md")
        .tempfile_in(temp_dir)?;

    let content = discourse.raw_topic(topic_id).await?;
    remote_copy.write_all(&content)?;
    remote_copy.write_all(b"\n")?;
    remote_copy.flush()?;
    debug!(path = %remote_copy.path().display(), bytes = content.len() + 1, "Wrote remote copy");

    let invocation = ToolInvocation::from_command(&config.tools.diff)?
        .arg(remote_copy.path())
        .arg(filename);
    let exit = tools.run(&invocation);
    remote_copy.close()?;

    let exit = exit?;
    debug!(code = ?exit.code, "diff finished");
    Ok(exit)
}

/// Open discedit on the topic, with `EDITOR` set to the diff tool on `filename`.
pub fn edit_topic(
    config: &Config,
    filename: &str,
    topic_id: &str,
    tools: &dyn ToolRunner,
) -> Result<ToolExit, Error> {
    let editor = format!("{} {}", config.tools.difftool, filename);
    let invocation = ToolInvocation::from_command(&config.tools.discedit)?
        .arg(config.topic_url(topic_id))
        .env("EDITOR", editor);
    tools.run(&invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fakes::{FakeDiscourse, FakeRunner};
    use std::ffi::OsString;
    use tempfile::TempDir;

    const INDEX: &str = "\
# Dqlite

## Navigation

| Level | Path | Navlink |
|--|--|--|
| 1 | tutorial | [Tutorial](/t/tutorial/12) |
| 1 | /t/example-topic/99 | [Doc](/t/example-topic/99) |

## Redirects
";

    fn setup() -> (TempDir, Config) {
        let temp = TempDir::new().unwrap();
        let index = temp.path().join("index.md");
        std::fs::write(&index, INDEX).unwrap();
        std::fs::create_dir(temp.path().join("tmp")).unwrap();

        let mut config = Config::default();
        config.index.file = index.to_string_lossy().into_owned();
        (temp, config)
    }

    fn temp_entries(temp: &TempDir) -> usize {
        std::fs::read_dir(temp.path().join("tmp")).unwrap().count()
    }

    #[tokio::test]
    async fn test_sync_known_file() {
        let (temp, config) = setup();
        let discourse = FakeDiscourse::with_topic("12", "# Tutorial\n\nStart here.");
        let runner = FakeRunner::new();

        let outcome = run_in(&config, "tutorial.md", &discourse, &runner, &temp.path().join("tmp"))
            .await
            .unwrap();

        assert_eq!(outcome.topic_id, "12");
        assert_eq!(discourse.requests(), vec!["12".to_string()]);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "diff");
        assert_eq!(calls[0].args[1], OsString::from("tutorial.md"));
        assert!(calls[0].env.is_empty());

        assert_eq!(calls[1].program, "discedit");
        assert_eq!(
            calls[1].args,
            vec![OsString::from("https://discourse.dqlite.io/t/12")]
        );
        assert_eq!(
            calls[1].env,
            vec![("EDITOR".to_string(), "meld tutorial.md".to_string())]
        );
    }

    #[tokio::test]
    async fn test_remote_copy_gets_trailing_newline() {
        let (temp, config) = setup();
        let discourse = FakeDiscourse::with_topic("12", "# Tutorial\n\nStart here.");
        let runner = FakeRunner::new();

        run_in(&config, "tutorial.md", &discourse, &runner, &temp.path().join("tmp"))
            .await
            .unwrap();

        let contents = runner.first_arg_contents.lock().unwrap().clone();
        assert_eq!(
            contents[0].as_deref(),
            Some(b"# Tutorial\n\nStart here.\n".as_slice())
        );
        assert_eq!(temp_entries(&temp), 0);
    }

    #[tokio::test]
    async fn test_remote_copy_removed_when_diff_fails() {
        let (temp, config) = setup();
        let discourse = FakeDiscourse::with_topic("12", "remote");
        let runner = FakeRunner::new().exit_with("diff", 1);

        let outcome = run_in(&config, "tutorial.md", &discourse, &runner, &temp.path().join("tmp"))
            .await
            .unwrap();

        assert_eq!(outcome.diff.code, Some(1));
        assert!(outcome.discedit.success());
        assert_eq!(temp_entries(&temp), 0);
    }

    #[tokio::test]
    async fn test_remote_copy_removed_when_fetch_fails() {
        let (temp, config) = setup();
        let discourse = FakeDiscourse::default();
        let runner = FakeRunner::new();

        let result =
            run_in(&config, "tutorial.md", &discourse, &runner, &temp.path().join("tmp")).await;

        assert!(result.is_err());
        assert!(runner.calls().is_empty());
        assert_eq!(temp_entries(&temp), 0);
    }

    #[tokio::test]
    async fn test_unknown_file_makes_no_request() {
        let (temp, config) = setup();
        let discourse = FakeDiscourse::with_topic("12", "remote");
        let runner = FakeRunner::new();

        let result =
            run_in(&config, "missing.md", &discourse, &runner, &temp.path().join("tmp")).await;

        assert!(matches!(result, Err(Error::NotInMapping(ref f)) if f == "missing.md"));
        assert!(discourse.requests().is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_topic_path_file_name() {
        let (temp, config) = setup();
        let discourse = FakeDiscourse::with_topic("99", "example");
        let runner = FakeRunner::new();

        let outcome = run_in(
            &config,
            "/t/example-topic/99.md",
            &discourse,
            &runner,
            &temp.path().join("tmp"),
        )
        .await
        .unwrap();

        assert_eq!(outcome.topic_id, "99");
        assert_eq!(discourse.requests(), vec!["99".to_string()]);
        assert_eq!(config.raw_url(&outcome.topic_id), "https://discourse.dqlite.io/raw/99");
    }

    #[test]
    fn test_index_file_resolves_to_its_own_topic() {
        let (_temp, config) = setup();
        let id = resolve_topic(&config, "index.md").unwrap();
        assert_eq!(id, "34");
    }

    #[test]
    fn test_missing_index_file() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.index.file = temp.path().join("index.md").to_string_lossy().into_owned();

        assert!(matches!(
            resolve_topic(&config, "tutorial.md"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_custom_discedit_command() {
        let mut config = Config::default();
        config.tools.discedit = "python3 /opt/discedit.py".to_string();
        config.tools.difftool = "kdiff3".to_string();
        let runner = FakeRunner::new();

        edit_topic(&config, "how-to.md", "15", &runner).unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].program, "python3");
        assert_eq!(
            calls[0].args,
            vec![
                OsString::from("/opt/discedit.py"),
                OsString::from("https://discourse.dqlite.io/t/15"),
            ]
        );
        assert_eq!(
            calls[0].env,
            vec![("EDITOR".to_string(), "kdiff3 how-to.md".to_string())]
        );
    }
}
