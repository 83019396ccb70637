//! Query language for selecting descriptors.
//!
//! # Syntax Overview
//!
//! A query is a boolean combination of keyword tests:
//!
//! - **Keywords**: `artifact`, `parent`, `dependency`, `property`
//! - **Comparators**: `=`, `!=`, `<`, `<=`, `>`, `>=`
//! - **Values**: `group:artifact:version` coordinates (parts may be left
//!   out, `*` is a wildcard) or a property name
//! - **Operators**: `AND`/`&&`, `OR`/`||`, parentheses for grouping
//!
//! `&&` and `||` bind equally and fold left to right:
//! `artifact=com.foo:* AND dependency>=com.x:y:2.0.0 OR parent=org.acme`
//!
//! Compilation runs in stages: [`normalize`] produces the canonical query
//! text, [`to_predicate_calls`] rewrites keyword tests into call form,
//! [`cleanup`] repairs dangling operators and empty groups, and the result
//! is parsed into a [`QueryExpression`].

mod compiler;
mod expression;
mod normalize;

pub use compiler::{cleanup, compile_query, to_predicate_calls};
pub use expression::{evaluate, Expression, LogicalOp, QueryExpression};
pub use normalize::normalize;

#[cfg(test)]
mod tests;
