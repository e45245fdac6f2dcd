use crate::core::generations::resolve;
use crate::core::releases::{fetch_releases, published_newest_first};
use crate::core::report::{Report, SkippedRepository};
use crate::core::repositories::list_active_repositories;
use crate::domain::model::ReportLine;
use crate::domain::ports::HostingApi;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

/// Default number of repositories processed at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentReleasesRequest {
    /// User or organization owning the repositories.
    pub owner: String,
    /// Restricts the run to one repository; every error is then fatal.
    pub repo_name: Option<String>,
    /// Upper bound on in-flight repositories; `0` lifts the bound.
    pub max_concurrency: usize,
}

impl RecentReleasesRequest {
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_name: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_repo(mut self, repo_name: impl Into<String>) -> Self {
        self.repo_name = Some(repo_name.into());
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Current and previous release tags of one repository, or `None` when it
/// has no published releases.
pub async fn resolve_repository(
    api: &dyn HostingApi,
    owner: &str,
    repo: &str,
) -> Result<Option<ReportLine>> {
    let releases = fetch_releases(api, owner, repo).await?;
    let published = published_newest_first(repo, releases)?;

    Ok(resolve(&published)?.map(|generations| ReportLine {
        repo: repo.to_string(),
        current: generations.current.tag_name.clone(),
        previous: generations.previous.map(|r| r.tag_name.clone()),
    }))
}

pub async fn run(api: Arc<dyn HostingApi>, request: &RecentReleasesRequest) -> Result<Report> {
    match &request.repo_name {
        Some(repo) => {
            tracing::info!(owner = %request.owner, repo = %repo, "resolving recent releases");
            let line = resolve_repository(api.as_ref(), &request.owner, repo).await?;
            Ok(Report::new(line.into_iter().collect(), Vec::new()))
        }
        None => run_for_owner(api, request).await,
    }
}

async fn run_for_owner(api: Arc<dyn HostingApi>, request: &RecentReleasesRequest) -> Result<Report> {
    let repositories = list_active_repositories(api.as_ref(), &request.owner).await?;
    tracing::info!(
        owner = %request.owner,
        repositories = repositories.len(),
        max_concurrency = request.max_concurrency,
        "resolving recent releases"
    );

    let lines: Arc<Mutex<Vec<ReportLine>>> = Arc::new(Mutex::new(Vec::new()));
    let skipped: Arc<Mutex<Vec<SkippedRepository>>> = Arc::new(Mutex::new(Vec::new()));
    let semaphore = (request.max_concurrency > 0)
        .then(|| Arc::new(Semaphore::new(request.max_concurrency)));

    let mut join_set = JoinSet::new();
    let mut workers = HashMap::new();
    for repository in repositories {
        let repo = repository.name;
        let api = Arc::clone(&api);
        let owner = request.owner.clone();
        let lines = Arc::clone(&lines);
        let skipped = Arc::clone(&skipped);
        let semaphore = semaphore.clone();

        let worker_repo = repo.clone();
        let handle = join_set.spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            let repo = worker_repo;

            match resolve_repository(api.as_ref(), &owner, &repo).await {
                Ok(Some(line)) => {
                    tracing::debug!(repo = %repo, line = %line, "resolved");
                    lines.lock().await.push(line);
                    Ok(())
                }
                Ok(None) => {
                    tracing::debug!(repo = %repo, "no published releases");
                    Ok(())
                }
                Err(e) if e.is_per_repository() => {
                    tracing::warn!(repo = %repo, error = %e, "could not get releases");
                    skipped.lock().await.push(SkippedRepository {
                        repo,
                        reason: e.to_string(),
                    });
                    Ok(())
                }
                Err(e) => Err(e),
            }
        });
        workers.insert(handle.id(), repo);
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, "aborting remaining repositories");
                join_set.abort_all();
                return Err(e);
            }
            // A crashed worker only loses its own repository.
            Err(e) => {
                let repo = workers.remove(&e.id()).unwrap_or_default();
                tracing::warn!(repo = %repo, error = %e, "release worker failed");
                skipped.lock().await.push(SkippedRepository {
                    repo,
                    reason: e.to_string(),
                });
            }
        }
    }

    let lines = std::mem::take(&mut *lines.lock().await);
    let skipped = std::mem::take(&mut *skipped.lock().await);
    Ok(Report::new(lines, skipped))
}
