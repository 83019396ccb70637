//! rgs: Repository Search - select repositories by their build descriptors.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use search::Config;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "rgs")]
#[command(about = "Repository Search - select repositories whose build descriptors match a query")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a query against descriptor snapshots
    #[command(visible_alias = "s")]
    Search {
        /// Query (e.g., "artifact=com.foo:* AND dependency>=com.x:y:2.0.0")
        #[arg(short = 'q', long = "query")]
        query: String,

        /// Descriptor files or directories (default: configured descriptor_dir)
        paths: Vec<PathBuf>,

        /// Output format: table, json (default: configured output_format)
        #[arg(short = 'f', long = "format")]
        format: Option<String>,
    },

    /// Show how a query compiles
    Explain {
        /// Query to compile
        query: String,
    },

    /// Compare two versions (e.g., rgs version 1.2.0 '>=' 1.0.0)
    Version {
        /// Actual version (major.minor.patch)
        actual: String,

        /// Comparator: =, !=, <, <=, >, >=
        comparator: String,

        /// Expected version (major.minor.patch)
        expected: String,
    },

    /// Print the effective configuration
    Config,
}

/// RUST_LOG wins, then --verbose, then the configured filter.
fn init_logging(verbose: bool, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load();
    let log_filter = config.as_ref().map_or("warn", |c| c.log_filter.as_str());
    init_logging(cli.verbose, log_filter);

    let result = config.and_then(|config| match cli.command {
        Commands::Search { query, paths, format } => {
            commands::search(&config, &query, &paths, format.as_deref())
        }
        Commands::Explain { query } => commands::explain(&query),
        Commands::Version { actual, comparator, expected } => {
            commands::version(&actual, &comparator, &expected)
        }
        Commands::Config => commands::config(&config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
