//! In-memory [`HostingApi`] used by the core unit tests.

use crate::domain::model::{Page, PageRequest, ReleaseRecord, RepositoryRecord};
use crate::domain::ports::HostingApi;
use crate::utils::error::{GhmError, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub(crate) struct FakeHostingApi {
    page_size: usize,
    repositories: Vec<RepositoryRecord>,
    releases: HashMap<String, Vec<ReleaseRecord>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    pub(crate) requests: Mutex<Vec<String>>,
}

impl FakeHostingApi {
    /// Serves listings in pages of `page_size` items.
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            page_size,
            repositories: Vec::new(),
            releases: HashMap::new(),
            failing: HashSet::new(),
            panicking: HashSet::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_repository(mut self, name: &str, archived: bool) -> Self {
        self.repositories.push(RepositoryRecord {
            name: name.to_string(),
            archived,
        });
        self
    }

    /// Each release is `(tag, day of January 2024, draft)`.
    pub(crate) fn with_releases(mut self, repo: &str, releases: &[(&str, Option<u32>, bool)]) -> Self {
        let records = releases
            .iter()
            .map(|(tag, day, draft)| release(repo, tag, *day, *draft))
            .collect();
        self.releases.insert(repo.to_string(), records);
        self
    }

    pub(crate) fn failing(mut self, repo: &str) -> Self {
        self.failing.insert(repo.to_string());
        self
    }

    pub(crate) fn panicking(mut self, repo: &str) -> Self {
        self.panicking.insert(repo.to_string());
        self
    }

    fn paginate<T: Clone>(&self, items: &[T], request: PageRequest) -> Page<T> {
        let start = (request.page as usize - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        let slice = if start < items.len() {
            items[start..end].to_vec()
        } else {
            Vec::new()
        };
        Page {
            items: slice,
            next_page: (end < items.len()).then_some(request.page + 1),
        }
    }
}

pub(crate) fn release(repo: &str, tag: &str, day: Option<u32>, draft: bool) -> ReleaseRecord {
    ReleaseRecord {
        tag_name: tag.to_string(),
        published_at: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()),
        draft,
        url: format!("https://api.github.com/repos/acme/{repo}/releases/{tag}"),
    }
}

#[async_trait]
impl HostingApi for FakeHostingApi {
    async fn repositories_page(
        &self,
        owner: &str,
        page: PageRequest,
    ) -> Result<Page<RepositoryRecord>> {
        self.requests
            .lock()
            .unwrap()
            .push(format!("repos {owner} page={}", page.page));
        Ok(self.paginate(&self.repositories, page))
    }

    async fn releases_page(
        &self,
        owner: &str,
        repo: &str,
        page: PageRequest,
    ) -> Result<Page<ReleaseRecord>> {
        self.requests
            .lock()
            .unwrap()
            .push(format!("releases {owner}/{repo} page={}", page.page));
        if self.panicking.contains(repo) {
            panic!("release listing for {repo} crashed");
        }
        if self.failing.contains(repo) {
            return Err(GhmError::UnexpectedStatus {
                url: format!("https://api.github.com/repos/{owner}/{repo}/releases"),
                status: 500,
            });
        }
        let releases = self.releases.get(repo).cloned().unwrap_or_default();
        Ok(self.paginate(&releases, page))
    }
}
