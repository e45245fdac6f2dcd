use crate::core::pagination::collect_pages;
use crate::domain::model::ReleaseRecord;
use crate::domain::ports::HostingApi;
use crate::utils::error::{GhmError, Result};
use chrono::{DateTime, Utc};

/// A non-draft release whose publish timestamp is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRelease {
    pub tag_name: String,
    pub published_at: DateTime<Utc>,
    pub url: String,
}

/// Every release of `owner/repo`, across all pages.
pub async fn fetch_releases(
    api: &dyn HostingApi,
    owner: &str,
    repo: &str,
) -> Result<Vec<ReleaseRecord>> {
    collect_pages(move |page| api.releases_page(owner, repo, page)).await
}

/// Drops drafts and orders the rest newest first.
///
/// A published release without a timestamp is a [`GhmError::DataIntegrity`]
/// fault; nothing is sorted in that case.
pub fn published_newest_first(
    repo: &str,
    releases: Vec<ReleaseRecord>,
) -> Result<Vec<PublishedRelease>> {
    let mut published = releases
        .into_iter()
        .filter(|release| !release.draft)
        .map(|release| match release.published_at {
            Some(published_at) => Ok(PublishedRelease {
                tag_name: release.tag_name,
                published_at,
                url: release.url,
            }),
            None => Err(GhmError::DataIntegrity {
                repo: repo.to_string(),
                url: release.url,
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    Ok(published)
}
