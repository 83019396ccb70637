//! Tests for query normalization, compilation and evaluation.

use super::expression::parse_expression;
use super::*;
use crate::descriptor::{ArtifactCoordinate, ProjectDescriptor};
use crate::Error;

fn descriptor() -> ProjectDescriptor {
    ProjectDescriptor::new(Some("com.foo"), "bar", Some("1.2.0"))
        .with_dependency(ArtifactCoordinate::new("com.x", "y", Some("2.0.0")))
}

fn selects(query: &str, descriptor: &ProjectDescriptor) -> bool {
    compile_query(query).unwrap().evaluate(descriptor).unwrap()
}

// Normalizer

#[test]
fn test_normalize_replaces_words_with_operators() {
    assert_eq!(
        normalize("artifact=com.foo:bar AND parent!=x:y"),
        "artifact=com.foo:bar && parent!=x:y"
    );
    assert_eq!(
        normalize("artifact=a Or artifact=b"),
        "artifact=a || artifact=b"
    );
}

#[test]
fn test_normalize_spacing_and_line_breaks() {
    assert_eq!(
        normalize("  Artifact=Com.Foo:Bar\n OR\r\n(dependency=a:b&&parent=c)"),
        "artifact=com.foo:bar || ( dependency=a:b && parent=c )"
    );
}

#[test]
fn test_normalize_keeps_words_containing_and_or() {
    assert_eq!(
        normalize("artifact=band:orchestra"),
        "artifact=band:orchestra"
    );
}

#[test]
fn test_normalize_only_rewrites_whole_words() {
    assert_eq!(
        normalize("artifact=com.and:x OR parent=or.acme:and-core"),
        "artifact=com.and:x || parent=or.acme:and-core"
    );
    assert_eq!(
        to_predicate_calls(&normalize("dependency=com.and:x")).unwrap(),
        "dependency(=,com.and:x)"
    );
}

#[test]
fn test_normalize_empty() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" \n\t "), "");
}

// Predicate calls and cleanup

#[test]
fn test_predicate_calls_longest_comparator_first() {
    assert_eq!(
        to_predicate_calls("artifact>=com.foo:bar:1.0.0").unwrap(),
        "artifact(>=,com.foo:bar:1.0.0)"
    );
    assert_eq!(
        to_predicate_calls("dependency<=a:b:1.0.0 || parent!=c").unwrap(),
        "dependency(<=,a:b:1.0.0) || parent(!=,c)"
    );
}

#[test]
fn test_predicate_calls_pass_other_words_through() {
    assert_eq!(
        to_predicate_calls("( artifact && hello )").unwrap(),
        "( artifact && hello )"
    );
}

#[test]
fn test_predicate_calls_reject_long_coordinates() {
    let err = to_predicate_calls("artifact=a:b:c:d").unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
}

#[test]
fn test_cleanup_empty_groups() {
    assert_eq!(cleanup("( )"), "");
    assert_eq!(cleanup("(   )"), "");
    assert_eq!(cleanup("( && )"), "");
    assert_eq!(cleanup("( || )"), "");
    assert_eq!(cleanup("&& )"), ")");
}

#[test]
fn test_cleanup_dangling_operators() {
    assert_eq!(cleanup("&& artifact(=,a)"), "artifact(=,a)");
    assert_eq!(cleanup("|| artifact(=,a)"), "artifact(=,a)");
    assert_eq!(cleanup("artifact(=,a) && && ||"), "artifact(=,a) && &&");
    assert_eq!(cleanup("artifact(=,a) && &&"), "artifact(=,a)");
    assert_eq!(cleanup("( artifact(=,a) || )"), "( artifact(=,a) )");
    assert_eq!(cleanup("artifact(=,a) && ( )"), "artifact(=,a)");
}

#[test]
fn test_cleanup_operator_after_open() {
    let cleaned = cleanup("( && artifact(=,a) )");
    assert_eq!(cleaned, "(artifact(=,a) )");
    let expr = parse_expression(&cleaned).unwrap().unwrap();
    assert_eq!(expr.to_string(), "artifact(=,a)");
}

// Compilation

#[test]
fn test_empty_group_queries_contain_no_search() {
    for query in ["( )", "&& )", "( && )", "( || ) &&", "||"] {
        let compiled = compile_query(query).unwrap();
        assert!(!compiled.contains_search(), "{query} should contain no search");
    }
}

#[test]
fn test_query_without_keywords_contains_no_search() {
    for query in ["", "   ", "hello world", "artifact", "AND OR"] {
        let compiled = compile_query(query).unwrap();
        assert!(!compiled.contains_search(), "{query:?} should contain no search");
        assert!(!compiled.evaluate(&descriptor()).unwrap());
    }
}

#[test]
fn test_compiled_strings_are_exposed() {
    let compiled = compile_query("Artifact=com.foo:bar AND ( )").unwrap();
    assert_eq!(compiled.normalized(), "artifact=com.foo:bar && ( )");
    assert_eq!(compiled.predicate_calls(), "artifact(=,com.foo:bar)");
    assert!(compiled.contains_search());
}

#[test]
fn test_operators_fold_left_without_precedence() {
    let compiled = compile_query("artifact=a || artifact=b && artifact=c").unwrap();
    assert_eq!(
        compiled.root().unwrap().to_string(),
        "((artifact(=,a) || artifact(=,b)) && artifact(=,c))"
    );

    let d = ProjectDescriptor::new(Some("a"), "x", None);
    assert!(!compiled.evaluate(&d).unwrap());
}

#[test]
fn test_parentheses_group() {
    let compiled = compile_query("artifact=a || (artifact=b && artifact=c)").unwrap();
    assert_eq!(
        compiled.root().unwrap().to_string(),
        "(artifact(=,a) || (artifact(=,b) && artifact(=,c)))"
    );

    let d = ProjectDescriptor::new(Some("a"), "x", None);
    assert!(compiled.evaluate(&d).unwrap());
}

#[test]
fn test_predicates_in_order() {
    let compiled = compile_query("parent=p || (dependency=d && property=k)").unwrap();
    let keywords: Vec<_> = compiled
        .root()
        .unwrap()
        .predicates()
        .iter()
        .map(|p| p.keyword.name())
        .collect();
    assert_eq!(keywords, vec!["parent", "dependency", "property"]);
}

#[test]
fn test_unbalanced_parentheses() {
    for query in ["( artifact=com.foo:bar", "artifact=com.foo:bar )", "(( artifact=a )"] {
        let err = compile_query(query).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)), "{query}: {err}");
    }
}

#[test]
fn test_stray_words_with_predicates() {
    let err = compile_query("artifact=com.foo:bar hello").unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    let err = compile_query("artifact=a && && artifact=b").unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
}

#[test]
fn test_unknown_comparator_in_call() {
    let err = parse_expression("artifact(==,com.foo)").unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    let err = parse_expression("artifact(=,com.foo").unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
}

// End-to-end

#[test]
fn test_artifact_exact_match() {
    assert!(selects("artifact=com.foo:bar:1.2.0", &descriptor()));
}

#[test]
fn test_dependency_version_mismatch() {
    assert!(!selects("dependency=com.x:y:1.0.0", &descriptor()));
}

#[test]
fn test_missing_parent_fails_negated_query() {
    assert!(!selects("parent!=com.x:y:1.0.0", &descriptor()));
}

#[test]
fn test_negated_query_without_version_excludes_match() {
    let d = descriptor().with_parent(ArtifactCoordinate::new("org.acme", "platform", Some("3.1.0")));
    assert!(!selects("artifact!=com.foo:bar", &d));
    assert!(!selects("parent!=org.acme:platform", &d));
    assert!(selects("artifact!=com.foo:baz", &d));
    assert!(selects("parent!=org.acme:other", &d));
    assert!(selects("artifact=com.foo:bar", &d));
}

#[test]
fn test_negated_dependency_without_version() {
    // The only dependency matches, so the scan finds no hit and exhausts.
    assert!(selects("dependency!=com.x:y", &descriptor()));
    // Any other dependency is a hit under != and ends the scan.
    let d = descriptor().with_dependency(ArtifactCoordinate::new("org.z", "w", None));
    assert!(!selects("dependency!=com.x:y", &d));
}

#[test]
fn test_whitespace_query_selects_nothing() {
    let compiled = compile_query(" \n ").unwrap();
    assert!(!compiled.contains_search());
    assert!(!evaluate(&compiled, &descriptor()).unwrap());
}

#[test]
fn test_version_ordering_queries() {
    let d = descriptor();
    assert!(selects("artifact>=com.foo:bar:1.0.0", &d));
    assert!(selects("artifact>com.foo:bar:1.1.9", &d));
    assert!(!selects("artifact<=com.foo:bar:1.1.9", &d));
    assert!(selects("dependency<com.x:y:2.0.1", &d));
}

#[test]
fn test_wildcards_and_case_folding() {
    let d = descriptor();
    assert!(selects("ARTIFACT=COM.*:BAR", &d));
    assert!(selects("dependency=com.x:*", &d));
    assert!(!selects("dependency=org.*", &d));
}

#[test]
fn test_property_query() {
    let d = descriptor().with_property("flyway", "Flyway");
    assert!(selects("property=Flyway", &d));
    assert!(!selects("property!=flyway", &d));
    assert!(selects("property!=liquibase", &d));

    let err = compile_query("property>flyway")
        .unwrap()
        .evaluate(&d)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_short_circuit_skips_failing_predicates() {
    let d = descriptor();
    assert!(selects("artifact=com.foo:bar || dependency=com.x:y:bogus", &d));
    assert!(!selects("artifact=org.none && dependency=com.x:y:bogus", &d));

    let err = compile_query("dependency=com.x:y:bogus")
        .unwrap()
        .evaluate(&d)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidVersion(_)));
}

#[test]
fn test_empty_coordinate_fails_at_evaluation() {
    let compiled = compile_query("artifact=").unwrap();
    assert!(compiled.contains_search());
    assert!(matches!(
        compiled.evaluate(&descriptor()),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_expression_is_shareable_across_threads() {
    let compiled = std::sync::Arc::new(compile_query("dependency>=com.x:y:1.0.0").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let compiled = compiled.clone();
            std::thread::spawn(move || compiled.evaluate(&descriptor()).unwrap())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
