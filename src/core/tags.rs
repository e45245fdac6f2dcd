use crate::utils::error::{GhmError, Result};

/// Major version of a dot-delimited release tag.
///
/// Only the first segment is inspected; one leading non-digit character
/// (typically `v`) is dropped before parsing.
pub fn major_version(tag: &str) -> Result<u64> {
    let first = tag.split('.').next().unwrap_or_default();
    let digits = match first.chars().next() {
        Some(prefix) if !prefix.is_ascii_digit() => &first[prefix.len_utf8()..],
        _ => first,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GhmError::TagParse {
            tag: tag.to_string(),
        });
    }

    digits.parse::<u64>().map_err(|_| GhmError::TagParse {
        tag: tag.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_version() {
        assert_eq!(major_version("v2.3.1").unwrap(), 2);
        assert_eq!(major_version("10.0.0").unwrap(), 10);
        assert_eq!(major_version("V7").unwrap(), 7);
        assert_eq!(major_version("v0.9.0").unwrap(), 0);
        assert_eq!(major_version("3.x.garbage").unwrap(), 3);
    }

    #[test]
    fn test_strips_at_most_one_prefix() {
        assert!(major_version("vv1.0.0").is_err());
        assert!(major_version("release-1.0").is_err());
    }

    #[test]
    fn test_rejects_non_numeric_segment() {
        for tag in ["", "v", "latest", "v+1.0", "v1a.0", "v99999999999999999999999.0"] {
            assert!(
                matches!(major_version(tag), Err(GhmError::TagParse { .. })),
                "{tag:?} should not parse"
            );
        }
    }
}
