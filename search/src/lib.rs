//! regov search: select repositories by their build-descriptor metadata.
//!
//! Queries combine keyword tests over a project's coordinate, parent,
//! dependencies and properties. Compile once with [`compile_query`], then
//! evaluate against each [`ProjectDescriptor`].

pub mod compare;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod predicate;
pub mod query;
pub mod scan;
pub mod version;

pub use compare::{compare_coordinate, compare_version, match_pattern, Comparator};
pub use config::Config;
pub use descriptor::{load_descriptor, load_descriptors, ArtifactCoordinate, ProjectDescriptor};
pub use error::{Error, Result};
pub use predicate::{Keyword, Predicate};
pub use query::{compile_query, evaluate, normalize, Expression, LogicalOp, QueryExpression};
pub use scan::{scan, ScanFailure, ScanReport};
pub use version::SemanticVersion;
