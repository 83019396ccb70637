//! CLI command implementations.

use std::path::{Path, PathBuf};

use search::{
    compare_version, compile_query, load_descriptor, load_descriptors, scan, Comparator, Config,
    Error, ProjectDescriptor, ScanReport,
};
use tracing::debug;

/// Output formats accepted by `search`.
const FORMATS: [&str; 2] = ["table", "json"];

/// Evaluate a query against descriptor snapshots and print the matches.
pub fn search(config: &Config, query: &str, paths: &[PathBuf], format: Option<&str>) -> search::Result<()> {
    let format = format.unwrap_or(config.output_format.as_str());
    if !FORMATS.contains(&format) {
        return Err(Error::InvalidArgument(format!(
            "unknown output format '{}' (expected one of: {})",
            format,
            FORMATS.join(", ")
        )));
    }

    let expression = compile_query(query)?;
    let descriptors = if paths.is_empty() {
        collect_descriptors(&[config.descriptors_path()])?
    } else {
        collect_descriptors(paths)?
    };
    let report = scan(&expression, &descriptors);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            if !expression.contains_search() {
                println!("Query contains no search.");
                return Ok(());
            }
            print_table(&report);
        }
    }
    Ok(())
}

/// Load descriptors from files and directories, in argument order.
fn collect_descriptors(paths: &[PathBuf]) -> search::Result<Vec<ProjectDescriptor>> {
    let mut descriptors = Vec::new();
    for path in paths {
        descriptors.extend(load_path(path)?);
    }
    debug!(count = descriptors.len(), "collected descriptors");
    Ok(descriptors)
}

fn load_path(path: &Path) -> search::Result<Vec<ProjectDescriptor>> {
    if path.is_dir() {
        load_descriptors(path)
    } else if path.is_file() {
        Ok(vec![load_descriptor(path)?])
    } else {
        Err(Error::InvalidArgument(format!(
            "no descriptor file or directory at {}",
            path.display()
        )))
    }
}

fn print_table(report: &ScanReport) {
    if report.is_empty() {
        println!("No matching repositories.");
    } else {
        println!("REPOSITORY");
        println!("{}", "-".repeat(40));
        for name in &report.matches {
            println!("{}", name);
        }
    }

    println!();
    println!(
        "{} matched, {} evaluated, {} failed",
        report.matches.len(),
        report.evaluated,
        report.failures.len()
    );

    for failure in &report.failures {
        eprintln!("Warning: {}: {}", failure.name, failure.error);
    }
}

/// Print each compilation stage of a query.
pub fn explain(query: &str) -> search::Result<()> {
    let expression = compile_query(query)?;

    println!("Normalized:      {}", expression.normalized());
    println!("Predicate calls: {}", expression.predicate_calls());

    let Some(root) = expression.root() else {
        println!("Expression:      no search");
        return Ok(());
    };
    println!("Expression:      {}", root);
    println!();
    println!("{:<12} {:<4} VALUE", "KEYWORD", "CMP");
    for predicate in root.predicates() {
        println!(
            "{:<12} {:<4} {}",
            predicate.keyword.name(),
            predicate.comparator.token(),
            predicate.value
        );
    }
    Ok(())
}

/// Compare two semantic versions and print the outcome.
pub fn version(actual: &str, comparator: &str, expected: &str) -> search::Result<()> {
    let comparator = Comparator::parse(comparator)?;
    println!("{}", compare_version(actual, expected, comparator)?);
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn config(config: &Config) -> search::Result<()> {
    println!("# {}", config.config_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}
