use crate::core::pagination::collect_pages;
use crate::domain::model::RepositoryRecord;
use crate::domain::ports::HostingApi;
use crate::utils::error::Result;

/// All repositories of `owner` that are not archived.
pub async fn list_active_repositories(
    api: &dyn HostingApi,
    owner: &str,
) -> Result<Vec<RepositoryRecord>> {
    let mut repositories = collect_pages(move |page| api.repositories_page(owner, page)).await?;
    let total = repositories.len();
    repositories.retain(|repo| !repo.archived);
    tracing::debug!(
        owner,
        total,
        archived = total - repositories.len(),
        "enumerated repositories"
    );
    Ok(repositories)
}
