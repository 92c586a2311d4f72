//! HTTP access to GitHub and Discourse.
//!
//! Both services sit behind a trait so the workflows can run against
//! in-memory fakes in tests.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Error;

/// Environment variable holding an optional GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One entry of a pull request's file list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
}

#[async_trait]
pub trait GithubClient: Send + Sync {
    /// Files changed by pull request `pr`, in API order.
    async fn pr_files(&self, pr: &str) -> Result<Vec<ChangedFile>, Error>;
}

#[async_trait]
pub trait DiscourseClient: Send + Sync {
    /// Raw Markdown of a topic.
    async fn raw_topic(&self, topic_id: &str) -> Result<Vec<u8>, Error>;
}

/// Send `request` for `url` and fail on non-success status.
async fn get_checked(request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response, Error> {
    debug!(url, "GET");
    let res = request.send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(res)
}

/// GitHub REST API client.
pub struct RealGithubClient {
    http_client: Client,
    config: Config,
    token: Option<String>,
}

impl RealGithubClient {
    pub fn new(config: Config) -> Self {
        Self {
            http_client: Client::new(),
            config,
            token: std::env::var(GITHUB_TOKEN_ENV).ok(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .http_client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}

#[async_trait]
impl GithubClient for RealGithubClient {
    async fn pr_files(&self, pr: &str) -> Result<Vec<ChangedFile>, Error> {
        let url = self.config.pr_files_url(pr);
        let body = get_checked(self.get(&url), &url).await?.text().await?;
        parse_pr_files(&body)
    }
}

/// Parse the pull-request-files response body.
pub fn parse_pr_files(body: &str) -> Result<Vec<ChangedFile>, Error> {
    Ok(serde_json::from_str(body)?)
}

/// Discourse client for raw topic content.
pub struct RealDiscourseClient {
    http_client: Client,
    config: Config,
}

impl RealDiscourseClient {
    pub fn new(config: Config) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl DiscourseClient for RealDiscourseClient {
    async fn raw_topic(&self, topic_id: &str) -> Result<Vec<u8>, Error> {
        let url = self.config.raw_url(topic_id);
        let request = self.http_client.get(&url).header("User-Agent", USER_AGENT);
        let bytes = get_checked(request, &url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
