//! Three-part `major.minor.patch` versions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A `major.minor.patch` version with total ordering.
///
/// Only plain numeric triples are accepted: qualifiers such as `-SNAPSHOT`
/// or a fourth component make the text invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// Parse `text` into a version.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::InvalidVersion("version is blank".to_string()));
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(Error::InvalidVersion(format!(
                "'{}' must have exactly three dot-separated parts",
                text
            )));
        }

        let component = |part: &str| {
            part.parse::<u64>()
                .map_err(|_| Error::InvalidVersion(format!("'{}' has non-numeric part '{}'", text, part)))
        };

        Ok(Self {
            major: component(parts[0])?,
            minor: component(parts[1])?,
            patch: component(parts[2])?,
        })
    }

    /// Three-way comparison as `-1`, `0` or `1`.
    pub fn compare(&self, other: &Self) -> i32 {
        match self.cmp(other) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// `false` when `other` is absent.
    pub fn is_equal(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|o| self.compare(o) == 0)
    }

    /// `false` when `other` is absent.
    pub fn is_higher(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|o| self.compare(o) > 0)
    }

    /// `false` when `other` is absent.
    pub fn is_lower(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|o| self.compare(o) < 0)
    }
}

impl FromStr for SemanticVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
