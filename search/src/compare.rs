//! Comparator algebra over versions, wildcard strings and coordinates.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::descriptor::ArtifactCoordinate;
use crate::version::SemanticVersion;
use crate::{Error, Result};

/// Comparison operators accepted in queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparator {
    /// Every comparator, two-character tokens first so prefix matching
    /// never splits `>=` into `>` and a value starting with `=`.
    pub const LONGEST_FIRST: [Comparator; 6] = [
        Comparator::Ne,
        Comparator::Le,
        Comparator::Ge,
        Comparator::Eq,
        Comparator::Lt,
        Comparator::Gt,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }

    /// Parse an exact comparator token.
    pub fn parse(token: &str) -> Result<Self> {
        Self::LONGEST_FIRST
            .into_iter()
            .find(|c| c.token() == token)
            .ok_or_else(|| Error::UnsupportedComparator(token.to_string()))
    }

    /// Split a leading comparator off `input`, returning it with the rest.
    pub fn strip_prefix(input: &str) -> Option<(Self, &str)> {
        Self::LONGEST_FIRST
            .into_iter()
            .find_map(|c| input.strip_prefix(c.token()).map(|rest| (c, rest)))
    }

    pub fn is_negated(self) -> bool {
        self == Comparator::Ne
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Compare two version strings with `comparator`.
pub fn compare_version(actual: &str, expected: &str, comparator: Comparator) -> Result<bool> {
    let actual = SemanticVersion::parse(actual)?;
    let expected = SemanticVersion::parse(expected)?;
    let expected = Some(&expected);

    Ok(match comparator {
        Comparator::Eq => actual.is_equal(expected),
        Comparator::Ne => !actual.is_equal(expected),
        Comparator::Lt => actual.is_lower(expected),
        Comparator::Le => actual.is_lower(expected) || actual.is_equal(expected),
        Comparator::Gt => actual.is_higher(expected),
        Comparator::Ge => actual.is_higher(expected) || actual.is_equal(expected),
    })
}

/// Full-string wildcard match of `actual` against `pattern`.
///
/// `*` stands for any run of ASCII letters, digits, `.`, `_` and `-`; every
/// other character matches itself. Only `=` and `!=` are meaningful here.
pub fn match_pattern(actual: &str, pattern: &str, comparator: Comparator) -> Result<bool> {
    let negate = match comparator {
        Comparator::Eq => false,
        Comparator::Ne => true,
        other => {
            return Err(Error::UnsupportedComparator(format!(
                "'{}' cannot be used for string matching",
                other
            )))
        }
    };

    let matched = wildcard_regex(pattern)?.is_match(actual);
    Ok(matched != negate)
}

fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[a-zA-Z_0-9.-]*");
    Regex::new(&format!("^(?:{})$", body))
        .map_err(|e| Error::InvalidQuery(format!("bad pattern '{}': {}", pattern, e)))
}

/// Match an expected coordinate (possibly partial, possibly wildcarded)
/// against an actual one.
///
/// Group and artifact are always matched with `=`. When either version is
/// absent a group/artifact match counts as a match, which `!=` rejects.
pub fn compare_coordinate(
    expected: &ArtifactCoordinate,
    actual: &ArtifactCoordinate,
    comparator: Comparator,
) -> Result<bool> {
    if expected.is_empty() {
        return Err(Error::InvalidArgument(
            "expected coordinate has no group, artifact or version".to_string(),
        ));
    }
    if actual.is_empty() {
        return Err(Error::InvalidArgument(
            "actual coordinate has no group, artifact or version".to_string(),
        ));
    }

    let group_matches = field_matches(expected.group_id(), actual.group_id())?;
    let artifact_matches = field_matches(expected.artifact_id(), actual.artifact_id())?;

    if group_matches && artifact_matches {
        return match (actual.version(), expected.version()) {
            (Some(actual_version), Some(expected_version)) => {
                compare_version(actual_version, expected_version, comparator)
            }
            _ => Ok(!comparator.is_negated()),
        };
    }

    Ok(comparator.is_negated())
}

fn field_matches(expected: Option<&str>, actual: Option<&str>) -> Result<bool> {
    match (expected, actual) {
        (None, _) => Ok(true),
        (Some(_), None) => Ok(false),
        (Some(pattern), Some(value)) => match_pattern(value, pattern, Comparator::Eq),
    }
}
