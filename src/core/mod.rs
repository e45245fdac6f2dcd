pub mod generations;
pub mod pagination;
pub mod recent_releases;
pub mod releases;
pub mod report;
pub mod repositories;
pub mod tags;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Page, PageRequest, ReleaseRecord, ReportLine, RepositoryRecord};
pub use crate::domain::ports::HostingApi;
pub use crate::utils::error::Result;
