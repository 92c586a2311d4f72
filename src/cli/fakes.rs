//! In-memory stand-ins for the network clients and the tool runner.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Error;
use crate::remote::{ChangedFile, DiscourseClient, GithubClient};
use crate::tools::{ToolExit, ToolInvocation, ToolRunner};

/// Serves a fixed file list for any PR and records requested PRs.
#[derive(Default)]
pub struct FakeGithub {
    pub files: Option<Vec<ChangedFile>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeGithub {
    pub fn with_files(names: &[&str]) -> Self {
        Self {
            files: Some(
                names
                    .iter()
                    .map(|n| ChangedFile {
                        filename: n.to_string(),
                    })
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GithubClient for FakeGithub {
    async fn pr_files(&self, pr: &str) -> Result<Vec<ChangedFile>, Error> {
        self.requests.lock().unwrap().push(pr.to_string());
        self.files
            .clone()
            .ok_or_else(|| Error::other("PR not found"))
    }
}

/// Serves raw topics from memory and records requested IDs.
#[derive(Default)]
pub struct FakeDiscourse {
    pub topics: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeDiscourse {
    pub fn with_topic(id: &str, content: &str) -> Self {
        let mut topics = HashMap::new();
        topics.insert(id.to_string(), content.as_bytes().to_vec());
        Self {
            topics,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiscourseClient for FakeDiscourse {
    async fn raw_topic(&self, topic_id: &str) -> Result<Vec<u8>, Error> {
        self.requests.lock().unwrap().push(topic_id.to_string());
        self.topics
            .get(topic_id)
            .cloned()
            .ok_or_else(|| Error::other(format!("topic {topic_id} not found")))
    }
}

/// Records every invocation instead of spawning it.
///
/// For each call the bytes of the file named by the first argument are
/// captured when that file exists, so tests can inspect temporary files that
/// are gone by the time the workflow returns.
pub struct FakeRunner {
    exit_codes: HashMap<String, i32>,
    pub calls: Mutex<Vec<ToolInvocation>>,
    pub first_arg_contents: Mutex<Vec<Option<Vec<u8>>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            exit_codes: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            first_arg_contents: Mutex::new(Vec::new()),
        }
    }

    /// Make `program` exit with `code`. Unlisted programs exit 0.
    pub fn exit_with(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolExit, Error> {
        let contents = invocation
            .args
            .first()
            .and_then(|arg| std::fs::read(arg).ok());
        self.first_arg_contents.lock().unwrap().push(contents);
        self.calls.lock().unwrap().push(invocation.clone());

        let code = self.exit_codes.get(&invocation.program).copied().unwrap_or(0);
        Ok(ToolExit { code: Some(code) })
    }
}
