//! Evaluating one query across many descriptors.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::descriptor::ProjectDescriptor;
use crate::query::QueryExpression;

/// A descriptor that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Names of selected descriptors, ordered and de-duplicated.
    pub matches: BTreeSet<String>,
    /// Descriptors whose evaluation failed; these are never selected.
    pub failures: Vec<ScanFailure>,
    /// Number of descriptors evaluated.
    pub evaluated: usize,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Evaluate `query` against every descriptor.
///
/// A failure is isolated to its own descriptor. A query without a search
/// selects nothing and evaluates nothing.
pub fn scan<'a, I>(query: &QueryExpression, descriptors: I) -> ScanReport
where
    I: IntoIterator<Item = &'a ProjectDescriptor>,
{
    let mut report = ScanReport::default();
    if !query.contains_search() {
        info!(query = %query.normalized(), "query contains no search");
        return report;
    }

    for descriptor in descriptors {
        report.evaluated += 1;
        let name = descriptor.display_name();
        match query.evaluate(descriptor) {
            Ok(true) => {
                report.matches.insert(name);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(descriptor = %name, error = %e, "unable to evaluate query");
                report.failures.push(ScanFailure {
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        evaluated = report.evaluated,
        matched = report.matches.len(),
        failed = report.failures.len(),
        "scan finished"
    );
    report
}
