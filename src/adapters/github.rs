use crate::config::AppConfig;
use crate::domain::model::{Page, PageRequest, ReleaseRecord, RepositoryRecord};
use crate::domain::ports::HostingApi;
use crate::utils::error::{GhmError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone)]
pub struct GitHubSettings {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub wait_on_rate_limit: bool,
    pub max_rate_limit_wait: Duration,
}

impl From<&AppConfig> for GitHubSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            auth_token: config.auth_token().map(str::to_string),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            wait_on_rate_limit: config.wait_on_rate_limit,
            max_rate_limit_wait: Duration::from_secs(config.max_rate_limit_wait_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    url: String,
}

impl From<GitHubRelease> for ReleaseRecord {
    fn from(release: GitHubRelease) -> Self {
        Self {
            tag_name: release.tag_name,
            published_at: release.published_at,
            draft: release.draft,
            url: release.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    #[serde(default)]
    archived: bool,
}

impl From<GitHubRepository> for RepositoryRecord {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            archived: repo.archived,
        }
    }
}

/// REST client for the two GitHub listings the report needs.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    wait_on_rate_limit: bool,
    max_rate_limit_wait: Duration,
}

impl GitHubClient {
    pub fn new(settings: GitHubSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| GhmError::InvalidConfigValue {
            field: "api_base_url".to_string(),
            value: settings.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GhmError::InvalidConfigValue {
                field: "api_base_url".to_string(),
                value: settings.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghm/", env!("CARGO_PKG_VERSION"))),
        );
        match &settings.auth_token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| GhmError::config("auth_token contains invalid characters"))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => tracing::warn!("Authentication token not found. Expect to be rate limited."),
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self {
            client,
            base_url,
            wait_on_rate_limit: settings.wait_on_rate_limit,
            max_rate_limit_wait: settings.max_rate_limit_wait,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(GitHubSettings::from(config))
    }

    fn endpoint(&self, segments: &[&str], page: PageRequest) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("per_page", &page.per_page.to_string())
            .append_pair("page", &page.page.to_string());
        url
    }

    /// GET that waits out rate-limit windows when configured to.
    async fn get(&self, url: &Url) -> Result<Response> {
        loop {
            tracing::debug!(url = %url, "GET");
            let response = self.client.get(url.clone()).send().await?;

            let Some(wait) = rate_limit_wait(response.status(), response.headers(), Utc::now())
            else {
                return Ok(response);
            };
            if !self.wait_on_rate_limit {
                return Err(GhmError::remote(
                    format!("GET {}", url),
                    format!("rate limit exceeded (HTTP {})", response.status().as_u16()),
                ));
            }

            let wait = wait.min(self.max_rate_limit_wait).max(Duration::from_secs(1));
            tracing::warn!(
                url = %url,
                wait_secs = wait.as_secs(),
                "rate limited, sleeping until reset"
            );
            tokio::time::sleep(wait).await;
        }
    }

    async fn into_page<D, T>(url: &Url, response: Response) -> Result<Page<T>>
    where
        D: DeserializeOwned,
        T: From<D>,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(GhmError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_from_link);
        let body = response.bytes().await?;
        let items: Vec<D> = serde_json::from_slice(&body)?;

        Ok(Page {
            items: items.into_iter().map(T::from).collect(),
            next_page,
        })
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn repositories_page(
        &self,
        owner: &str,
        page: PageRequest,
    ) -> Result<Page<RepositoryRecord>> {
        let url = self.endpoint(&["orgs", owner, "repos"], page);
        let response = self.get(&url).await?;
        if response.status() != StatusCode::NOT_FOUND {
            return Self::into_page::<GitHubRepository, _>(&url, response).await;
        }

        // Not an organization; try it as a user account.
        tracing::debug!(owner, "organization not found, listing user repositories");
        let url = self.endpoint(&["users", owner, "repos"], page);
        let response = self.get(&url).await?;
        Self::into_page::<GitHubRepository, _>(&url, response).await
    }

    async fn releases_page(
        &self,
        owner: &str,
        repo: &str,
        page: PageRequest,
    ) -> Result<Page<ReleaseRecord>> {
        let url = self.endpoint(&["repos", owner, repo, "releases"], page);
        let response = self.get(&url).await?;
        Self::into_page::<GitHubRelease, _>(&url, response).await
    }
}

fn link_next_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("valid link regex"))
}

/// Page number of the `rel="next"` entry of a `Link` header.
pub fn next_page_from_link(link: &str) -> Option<u32> {
    let captures = link_next_regex().captures(link)?;
    let next = Url::parse(&captures[1]).ok()?;
    next.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// How long to back off, if the response is a rate-limit rejection.
pub fn rate_limit_wait(
    status: StatusCode,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Option<Duration> {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    if let Some(seconds) = header(RETRY_AFTER.as_str()).and_then(|v| v.trim().parse::<u64>().ok()) {
        return Some(Duration::from_secs(seconds));
    }

    if header("x-ratelimit-remaining").map(str::trim) != Some("0") {
        return None;
    }
    let reset = header("x-ratelimit-reset")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(|| now.timestamp().saturating_add(60));
    let seconds = reset.saturating_sub(now.timestamp()).max(0) as u64;
    Some(Duration::from_secs(seconds.saturating_add(1)))
}
