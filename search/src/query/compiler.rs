//! Rewrites canonical query text into predicate-call form and repairs
//! malformed boolean shape left behind by dropped or empty groups.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::expression::{parse_expression, QueryExpression};
use super::normalize::normalize;
use crate::compare::Comparator;
use crate::predicate::{Keyword, Predicate};
use crate::Result;

lazy_static! {
    // Empty-group removal
    static ref OR_BEFORE_CLOSE: Regex = Regex::new(r"\|\|\s*\)").unwrap();
    static ref OR_AFTER_OPEN: Regex = Regex::new(r"\(\s*\|\|").unwrap();
    static ref AND_BEFORE_CLOSE: Regex = Regex::new(r"&&\s*\)").unwrap();
    static ref EMPTY_GROUP: Regex = Regex::new(r"\(\s*\)").unwrap();

    // Dangling-operator trim
    static ref LEADING_AND: Regex = Regex::new(r"^\s*&&\s*").unwrap();
    static ref LEADING_OR: Regex = Regex::new(r"^\s*\|\|\s*").unwrap();
    static ref SPACED_AND_BEFORE_CLOSE: Regex = Regex::new(r"\s*&&\s*\)").unwrap();
    static ref SPACED_OR_BEFORE_CLOSE: Regex = Regex::new(r"\s*\|\|\s*\)").unwrap();
    static ref SPACED_OR_AFTER_OPEN: Regex = Regex::new(r"\(\s*\|\|\s*").unwrap();
    static ref SPACED_AND_AFTER_OPEN: Regex = Regex::new(r"\(\s*&&\s*").unwrap();
    static ref TRAILING_AND: Regex = Regex::new(r"(&&\s*)+$").unwrap();
    static ref TRAILING_OR: Regex = Regex::new(r"(\|\|\s*)+$").unwrap();
}

/// Compile raw operator text into an evaluable expression.
///
/// A query that cleans up to nothing (or to operators and parentheses with
/// no keyword test) compiles to an expression without a search.
pub fn compile_query(raw: &str) -> Result<QueryExpression> {
    let normalized = normalize(raw);
    let calls = cleanup(&to_predicate_calls(&normalized)?);
    debug!(normalized = %normalized, predicate_calls = %calls, "compiled query");

    let root = parse_expression(&calls)?;
    Ok(QueryExpression::new(normalized, calls, root))
}

/// Replace every `keyword<comparator>value` word of a canonical query with
/// its predicate call, passing all other words through unchanged.
pub fn to_predicate_calls(canonical: &str) -> Result<String> {
    let mut words = Vec::new();
    for word in canonical.split(' ').filter(|w| !w.is_empty()) {
        match try_parse_predicate(word)? {
            Some(predicate) => words.push(predicate.to_string()),
            None => words.push(word.to_string()),
        }
    }
    Ok(words.join(" "))
}

/// Try to read `word` as a keyword test.
fn try_parse_predicate(word: &str) -> Result<Option<Predicate>> {
    for keyword in Keyword::ALL {
        let Some(after_keyword) = word.strip_prefix(keyword.name()) else {
            continue;
        };
        if let Some((comparator, value)) = Comparator::strip_prefix(after_keyword) {
            return Predicate::new(keyword, comparator, value).map(Some);
        }
    }
    Ok(None)
}

/// Remove empty groups and dangling `&&`/`||`.
pub fn cleanup(calls: &str) -> String {
    trim_dangling_operators(&remove_empty_groups(calls.trim()))
}

fn remove_empty_groups(query: &str) -> String {
    let query = OR_BEFORE_CLOSE.replace_all(query, ")");
    let query = OR_AFTER_OPEN.replace_all(&query, "(");
    let query = AND_BEFORE_CLOSE.replace_all(&query, ")");
    EMPTY_GROUP.replace_all(&query, "").into_owned()
}

fn trim_dangling_operators(query: &str) -> String {
    let query = LEADING_AND.replace(query, "");
    let query = LEADING_OR.replace(&query, "");
    let query = SPACED_AND_BEFORE_CLOSE.replace_all(&query, ")");
    let query = SPACED_OR_BEFORE_CLOSE.replace_all(&query, ")");
    let query = SPACED_OR_AFTER_OPEN.replace_all(&query, "(");
    let query = SPACED_AND_AFTER_OPEN.replace_all(&query, "(");
    let query = TRAILING_AND.replace(&query, "");
    let query = TRAILING_OR.replace(&query, "");
    query.trim().to_string()
}
