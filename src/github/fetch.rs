use crate::error::{IssueTasksError, Result};
use crate::github::issues::{GitHubIssue, StateFilter};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = "issue-tasks";
/// GitHub's maximum page size. Paging ends when a response carries no
/// `Link: rel="next"` cursor, not when a page comes back short.
const DEFAULT_PER_PAGE: u32 = 100;

/// Which issues to list.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueQuery {
    pub owner: String,
    pub repo: String,
    pub state: StateFilter,
    pub per_page: u32,
}

impl IssueQuery {
    pub fn new(owner: &str, repo: &str, state: StateFilter) -> Self {
        IssueQuery {
            owner: owner.to_string(),
            repo: repo.to_string(),
            state,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of the listing and whether the server advertised another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssuePage {
    pub issues: Vec<GitHubIssue>,
    pub has_next: bool,
}

/// A source of issue listing pages, numbered from 1.
pub trait IssuePageSource {
    fn fetch_page(
        &self,
        query: &IssueQuery,
        page: u32,
    ) -> impl Future<Output = Result<IssuePage>> + Send;
}

/// Whether a `Link` header value contains a `rel="next"` entry.
pub fn has_next_link(link: &str) -> bool {
    link.split(',').any(|entry| {
        entry
            .split(';')
            .skip(1)
            .any(|param| param.trim().eq_ignore_ascii_case(r#"rel="next""#))
    })
}

/// Reads issue pages from the GitHub REST API.
pub struct HttpIssueSource {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl HttpIssueSource {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpIssueSource {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn issues_url(&self, query: &IssueQuery) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base, query.owner, query.repo
        )
    }
}

impl IssuePageSource for HttpIssueSource {
    async fn fetch_page(&self, query: &IssueQuery, page: u32) -> Result<IssuePage> {
        let url = self.issues_url(query);
        debug!(%url, page, state = query.state.as_str(), "requesting issues");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("state", query.state.as_str().to_string()),
                ("per_page", query.per_page.to_string()),
                ("page", page.to_string()),
            ])
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IssueTasksError::RemoteRejected {
                status: status.to_string(),
                body,
            });
        }

        let has_next = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .is_some_and(has_next_link);

        let bytes = response.bytes().await?;
        let issues = serde_json::from_slice::<Vec<GitHubIssue>>(&bytes)
            .map_err(|e| IssueTasksError::Decode(format!("issue list: {e}")))?;
        Ok(IssuePage { issues, has_next })
    }
}

/// Collects every page of the listing, dropping pull requests.
///
/// Follows the source's next-page cursor; an empty page also ends the walk.
pub async fn fetch_issues<S: IssuePageSource>(
    source: &S,
    query: &IssueQuery,
) -> Result<Vec<GitHubIssue>> {
    let mut all_issues = Vec::new();
    let mut page = 1;

    loop {
        let IssuePage { issues, has_next } = source.fetch_page(query, page).await?;
        let received = issues.len();
        debug!(page, received, has_next, "received issue page");

        all_issues.extend(issues.into_iter().filter(|issue| !issue.is_pull_request()));

        if !has_next || received == 0 {
            break;
        }
        page += 1;
    }

    info!(
        "found {} issues in {}/{}",
        all_issues.len(),
        query.owner,
        query.repo
    );
    Ok(all_issues)
}
