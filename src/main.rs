use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ossid::{NulByteClassifier, ScanConfig, curate_document, fingerprint_file};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Open-source identification: WFP fingerprints and BOM result curation.
#[derive(Parser, Debug)]
#[command(name = "ossid", version, about, long_about = None)]
struct Cli {
    /// YAML scan configuration (winnowing switches and BOM path).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the WFP record of each file. Unreadable files are logged and skipped.
    Fingerprint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Apply the configured BOM rules to a match-result document.
    Curate {
        /// JSON results as returned by the knowledge base.
        results: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };

    match cli.command {
        Command::Fingerprint { files } => fingerprint_files(&config, &files),
        Command::Curate { results } => curate_file(&config, &results),
    }
}

fn fingerprint_files(config: &ScanConfig, paths: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let engine = config.engine()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in paths {
        match fingerprint_file(path, &engine, &NulByteClassifier) {
            Ok(record) => out.write_all(record.to_wfp().as_bytes())?,
            Err(err) => warn!(path = %path.display(), error = %err, "skipping file"),
        }
    }
    out.flush()?;
    Ok(())
}

fn curate_file(config: &ScanConfig, results: &Path) -> Result<(), Box<dyn Error>> {
    let rules = config.load_rule_set()?;
    let document = fs::read_to_string(results)?;
    let curated = curate_document(&document, &rules)?;
    println!("{}", serde_json::to_string_pretty(&curated)?);
    Ok(())
}
