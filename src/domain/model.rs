use chrono::{DateTime, Utc};
use std::fmt;

/// Fixed page size used for every paginated listing.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub tag_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub draft: bool,
    /// API URL of the release, kept for diagnostics.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub name: String,
    pub archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn first() -> Self {
        Self {
            page: 1,
            per_page: PAGE_SIZE,
        }
    }

    pub fn at(self, page: u32) -> Self {
        Self { page, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Set when the server advertised another page (`Link: rel="next"`).
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// One resolved repository in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub repo: String,
    pub current: String,
    pub previous: Option<String>,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {},", self.repo, self.current)?;
        match self.previous.as_deref() {
            Some(previous) if !previous.is_empty() => write!(f, " {}", previous),
            _ => Ok(()),
        }
    }
}
