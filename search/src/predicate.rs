//! The four keyword predicates evaluated against one descriptor.

use std::fmt;

use tracing::trace;

use crate::compare::{compare_coordinate, Comparator};
use crate::descriptor::{ArtifactCoordinate, ProjectDescriptor};
use crate::{Error, Result};

/// Query keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Artifact,
    Parent,
    Dependency,
    Property,
}

impl Keyword {
    pub const ALL: [Keyword; 4] = [
        Keyword::Artifact,
        Keyword::Parent,
        Keyword::Dependency,
        Keyword::Property,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Artifact => "artifact",
            Keyword::Parent => "parent",
            Keyword::Dependency => "dependency",
            Keyword::Property => "property",
        }
    }

    /// Whether the predicate value is a `g:a:v` coordinate.
    pub fn takes_coordinate(self) -> bool {
        self != Keyword::Property
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single `keyword<comparator>value` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub keyword: Keyword,
    pub comparator: Comparator,
    pub value: String,
    target: Option<ArtifactCoordinate>,
}

impl Predicate {
    /// Build a predicate, parsing the coordinate up front for the
    /// coordinate keywords so arity errors surface at compile time.
    pub fn new(keyword: Keyword, comparator: Comparator, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let target = if keyword.takes_coordinate() {
            Some(ArtifactCoordinate::parse(&value)?)
        } else {
            None
        };
        Ok(Self {
            keyword,
            comparator,
            value,
            target,
        })
    }

    pub fn evaluate(&self, descriptor: &ProjectDescriptor) -> Result<bool> {
        let result = match (self.keyword, &self.target) {
            (Keyword::Property, _) => property(descriptor, self.comparator, &self.value),
            (Keyword::Artifact, Some(target)) => artifact(descriptor, self.comparator, target),
            (Keyword::Parent, Some(target)) => parent(descriptor, self.comparator, target),
            (Keyword::Dependency, Some(target)) => dependency(descriptor, self.comparator, target),
            (keyword, None) => Err(Error::InvalidArgument(format!(
                "{} predicate has no coordinate",
                keyword
            ))),
        }?;
        trace!(predicate = %self, result, "evaluated predicate");
        Ok(result)
    }
}

/// Rendered in predicate-call form, e.g. `artifact(>=,com.foo:bar:1.0.0)`.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.keyword, self.comparator, self.value)
    }
}

/// The project's own coordinate, with the group inherited from the parent
/// when absent.
pub fn artifact(
    descriptor: &ProjectDescriptor,
    comparator: Comparator,
    expected: &ArtifactCoordinate,
) -> Result<bool> {
    let actual = descriptor.coordinate();
    trace!(group_id = ?actual.group_id(), "matching project coordinate");
    compare_coordinate(expected, &actual, comparator)
}

/// A project without a parent never satisfies a parent predicate, negated
/// or not.
pub fn parent(
    descriptor: &ProjectDescriptor,
    comparator: Comparator,
    expected: &ArtifactCoordinate,
) -> Result<bool> {
    match &descriptor.parent {
        Some(actual) => compare_coordinate(expected, actual, comparator),
        None => Ok(false),
    }
}

/// Scans dependencies in declaration order and stops at the first one whose
/// coordinate comparison holds.
///
/// For `!=` that first hit yields `false`, and only an exhausted scan yields
/// `true`. Because the coordinate comparison itself already returns `true`
/// for non-matching coordinates under `!=`, any non-matching dependency ends
/// a negated scan with `false`.
pub fn dependency(
    descriptor: &ProjectDescriptor,
    comparator: Comparator,
    expected: &ArtifactCoordinate,
) -> Result<bool> {
    for actual in &descriptor.dependencies {
        if compare_coordinate(expected, actual, comparator)? {
            return Ok(!comparator.is_negated());
        }
    }
    Ok(comparator.is_negated())
}

/// Looks for a property named `key` whose value equals `key` itself,
/// ignoring case. Only `=` and `!=` are accepted.
pub fn property(descriptor: &ProjectDescriptor, comparator: Comparator, key: &str) -> Result<bool> {
    if !matches!(comparator, Comparator::Eq | Comparator::Ne) {
        return Err(Error::InvalidArgument(format!(
            "property comparator can only be '{}' or '{}', got '{}'",
            Comparator::Eq,
            Comparator::Ne,
            comparator
        )));
    }

    let self_matching = descriptor
        .properties
        .get(key)
        .is_some_and(|value| value.to_lowercase() == key.to_lowercase());

    if comparator.is_negated() {
        Ok(descriptor.properties.is_empty() || !self_matching)
    } else {
        Ok(!descriptor.properties.is_empty() && self_matching)
    }
}
