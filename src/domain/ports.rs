use crate::domain::model::{Page, PageRequest, ReleaseRecord, RepositoryRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The two listings the release report needs from a hosting service.
///
/// Implementations fetch a single page; accumulation across pages lives in
/// [`crate::core::pagination`]. A call may block for a long time when the
/// service is rate limiting.
#[async_trait]
pub trait HostingApi: Send + Sync {
    async fn repositories_page(
        &self,
        owner: &str,
        page: PageRequest,
    ) -> Result<Page<RepositoryRecord>>;

    async fn releases_page(
        &self,
        owner: &str,
        repo: &str,
        page: PageRequest,
    ) -> Result<Page<ReleaseRecord>>;
}
