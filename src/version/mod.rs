//! Engine version banners.
//!
//! `docker -v` prints free-form text whose shape differs between engine
//! distributions, e.g. `Docker version 1.5.0, build a8a31ef` or
//! `Docker version 17.06.0-ce, build 02c1d87`. Only the first dotted numeric
//! sequence is meaningful; everything else is ignored.
mod capability;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

pub use capability::Capability;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?([-+~][0-9A-Za-z.\-+~]+)?")
        .expect("version pattern is valid")
});

/// A parsed engine version.
///
/// Ordering and equality only consider the numeric triple, so
/// `17.06.0-ce` and `17.06.0` compare equal.
#[derive(Debug, Clone)]
pub struct EngineVersion {
    major: u32,
    minor: u32,
    patch: u32,
    qualifier: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid engine version `{0}`")]
pub struct ParseVersionError(String);

impl EngineVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Distribution suffix such as `-ce`, if the banner carried one.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Returns `true` if `self` is strictly older than `other`.
    pub fn is_older_than(&self, other: &EngineVersion) -> bool {
        self < other
    }

    fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

/// Extracts the first dotted version number from a version banner.
///
/// Returns `None` when the banner contains no recognizable version. Callers
/// must treat that as "version unknown" and pick the most conservative
/// behaviour.
///
/// # Examples
///
/// ```
/// # use docker_cli_client::version::{parse_version_number, EngineVersion};
/// let version = parse_version_number("Docker version 1.5.0, build a8a31ef").unwrap();
/// assert!(version.is_older_than(&"1.10".parse::<EngineVersion>().unwrap()));
/// assert!(parse_version_number("xxx").is_none());
/// ```
pub fn parse_version_number(banner: &str) -> Option<EngineVersion> {
    let caps = VERSION_PATTERN.captures(banner)?;
    let component = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let version = EngineVersion {
        major: component(1)?,
        minor: component(2)?,
        patch: component(3)?,
        qualifier: caps.get(4).map(|m| m.as_str().to_owned()),
    };
    log::trace!("parsed engine version {version} from banner {banner:?}");
    Some(version)
}

impl FromStr for EngineVersion {
    type Err = ParseVersionError;

    /// Parses a literal version such as `1.10` or `1.5.0`.
    ///
    /// Unlike [`parse_version_number`] the whole input must be a version.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = [0u32; 3];
        let mut count = 0;
        for part in s.split('.') {
            if count == parts.len() {
                return Err(ParseVersionError(s.to_owned()));
            }
            parts[count] = part
                .parse()
                .map_err(|_| ParseVersionError(s.to_owned()))?;
            count += 1;
        }

        Ok(EngineVersion::new(parts[0], parts[1], parts[2]))
    }
}

impl PartialEq for EngineVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for EngineVersion {}

impl PartialOrd for EngineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EngineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            f.write_str(qualifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> EngineVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_valid_version() {
        let version = parse_version_number("Docker version 1.5.0, build a8a31ef").unwrap();
        assert!(!version.is_older_than(&v("1.1")));
        assert!(!version.is_older_than(&v("1.5")));
        assert!(version.is_older_than(&v("1.10")));
    }

    #[test]
    fn test_invalid_version() {
        assert!(parse_version_number("xxx").is_none());
        assert!(parse_version_number("").is_none());
        assert!(parse_version_number("Docker version unknown").is_none());
    }

    #[test]
    fn test_qualifier_is_ignored_for_ordering() {
        let version = parse_version_number("Docker version 17.06.0-ce, build 02c1d87").unwrap();
        assert_eq!(version.qualifier(), Some("-ce"));
        assert_eq!(version, v("17.6.0"));
        assert_eq!(version.to_string(), "17.6.0-ce");
    }

    #[test]
    fn test_extracts_triple_from_other_banners() {
        let podman = parse_version_number("podman version 4.3.1").unwrap();
        assert_eq!((podman.major(), podman.minor(), podman.patch()), (4, 3, 1));

        let debian = parse_version_number("Docker version 20.10.5+dfsg1, build 55c4c88").unwrap();
        assert_eq!((debian.major(), debian.minor(), debian.patch()), (20, 10, 5));
        assert_eq!(debian.qualifier(), Some("+dfsg1"));
    }

    #[test]
    fn test_missing_patch_is_zero() {
        let version = parse_version_number("engine 1.5").unwrap();
        assert_eq!(version, v("1.5.0"));
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("xxx".parse::<EngineVersion>().is_err());
        assert!("1.2.3.4".parse::<EngineVersion>().is_err());
        assert!("1..2".parse::<EngineVersion>().is_err());
    }

    #[test]
    fn test_numeric_not_lexicographic_ordering() {
        assert!(v("1.9").is_older_than(&v("1.10")));
        assert!(!v("1.10").is_older_than(&v("1.9")));
        assert!(v("1.10.1").is_older_than(&v("2")));
    }
}
