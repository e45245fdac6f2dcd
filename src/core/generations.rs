use crate::core::releases::PublishedRelease;
use crate::core::tags::major_version;
use crate::utils::error::Result;

/// The newest release and the newest release of a strictly lower major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generations<'a> {
    pub current: &'a PublishedRelease,
    pub previous: Option<&'a PublishedRelease>,
}

/// Walks a newest-first list. Releases sharing the current major are
/// skipped; the scan stops at the first lower major. `None` for an empty
/// list.
pub fn resolve(releases: &[PublishedRelease]) -> Result<Option<Generations<'_>>> {
    let Some((current, older)) = releases.split_first() else {
        return Ok(None);
    };
    let current_major = major_version(&current.tag_name)?;

    let mut previous = None;
    for release in older {
        if major_version(&release.tag_name)? < current_major {
            previous = Some(release);
            break;
        }
    }

    Ok(Some(Generations { current, previous }))
}
