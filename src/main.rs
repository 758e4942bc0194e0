use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use refsplice::classifier::{KeyClassifier, SuffixClassifier};
use refsplice::config::{load_config, save_config, validate_config, ResolverConfig, CONFIG_FILENAME};
use refsplice::errors::Result;
use refsplice::fetcher::DirectoryFetcher;
use refsplice::reporter::DefectLog;
use refsplice::resolution::Resolver;
use refsplice::types::{PluralPolicy, SpliceMode};

/// Resolves `*_id` / `*_ids` reference fields in JSON documents.
#[derive(Parser)]
#[command(name = "refsplice", about = "Splice referenced entities into JSON documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve references in a JSON document
    Resolve {
        /// Input file (default: stdin)
        input: Option<PathBuf>,
        /// Directory holding `<entity>/<id>.json` fixtures
        #[arg(short, long)]
        fixtures: PathBuf,
        /// Config file (default: ./refsplice.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keep the original reference keys next to the resolved ones
        #[arg(short, long)]
        augment: bool,
        /// Fail when any element of a reference list cannot be resolved
        #[arg(long)]
        abort_on_defect: bool,
        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Show how field names are classified
    Classify {
        /// Field names to classify
        #[arg(required = true)]
        keys: Vec<String>,
        /// Config file (default: ./refsplice.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration
    InitConfig {
        /// Destination (default: ./refsplice.json)
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve {
            input,
            fixtures,
            config,
            augment,
            abort_on_defect,
            pretty,
        } => {
            let mut config = load_config(&config_path(config))?;
            if augment {
                config.mode = SpliceMode::Augment;
            }
            if abort_on_defect {
                config.plural_policy = PluralPolicy::Abort;
            }

            let raw = read_input(input)?;
            let defects = Arc::new(DefectLog::new());
            let resolver = Resolver::from_config(&config, DirectoryFetcher::new(fixtures))
                .with_reporter(defects.clone());
            let out = resolver.resolve(&raw)?;

            for defect in defects.take() {
                eprintln!("warning: {}", defect);
            }

            if pretty {
                let value: serde_json::Value = serde_json::from_slice(&out)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", String::from_utf8_lossy(&out));
            }
        }
        Commands::Classify { keys, config } => {
            let config = load_config(&config_path(config))?;
            let classifier = SuffixClassifier::new(&config.naming);
            for key in &keys {
                match classifier.classify(key) {
                    Some(entity) => println!("{} -> {}", key, entity),
                    None => println!("{} -> (not a reference)", key),
                }
            }
        }
        Commands::InitConfig { path } => {
            let path = config_path(path);
            let config = ResolverConfig::default();
            validate_config(&config)?;
            save_config(&path, &config)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }
    Ok(())
}

/// Resolves an optional config path argument, defaulting to `refsplice.json`
/// in the current directory.
fn config_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Reads the whole input document from a file, or stdin when no path is given.
fn read_input(path: Option<PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(p) => Ok(std::fs::read(p)?),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
