//! PDC Config CLI
//!
//! Entry point for the `pdc-config` command-line tool.

use clap::{ArgAction, Parser, Subcommand};
use pdc_config::config::NetworkConfig;
use pdc_config::{verify_file, Builder, ConfigSequence};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pdc-config")]
#[command(about = "Private data collection config generator", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the collection config as JSON (default)
    Generate {
        /// Network config file (TOML) layered over the built-in bank list
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Emit single-line JSON instead of 2-space indentation
        #[arg(long)]
        compact: bool,

        /// Print the canonical SHA-256 of the output to stderr
        #[arg(long)]
        digest: bool,
    },

    /// Print the collection two participants share
    Resolve {
        /// First participant (or the regulator)
        a: String,

        /// Second participant (or the regulator)
        b: String,

        /// Network config file (TOML) layered over the built-in bank list
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Check an existing collection config document
    Verify {
        /// Path to the collection config JSON
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        None => run_generate(None, false, false),
        Some(Commands::Generate {
            config,
            compact,
            digest,
        }) => run_generate(config.as_deref(), compact, digest),
        Some(Commands::Resolve { a, b, config }) => run_resolve(&a, &b, config.as_deref()),
        Some(Commands::Verify { file, json }) => run_verify(&file, json),
    }
}

/// Logs go to stderr; stdout carries the document.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_sequence(config_path: Option<&Path>) -> ConfigSequence {
    let loaded = match NetworkConfig::load(config_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    info!(
        participants = loaded.network.participant_count(),
        regulator = %loaded.network.regulator,
        sources = loaded.sources.len(),
        "network config resolved"
    );

    match Builder::new(&loaded.network).build() {
        Ok(seq) => seq,
        Err(e) => {
            eprintln!("Error building collection config: {}", e);
            process::exit(1);
        }
    }
}

fn run_generate(config_path: Option<&Path>, compact: bool, digest: bool) {
    let seq = build_sequence(config_path);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = seq.write_to(&mut out, compact) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }

    if digest {
        match seq.digest() {
            Ok(d) => eprintln!("sha256:{}", d),
            Err(e) => {
                eprintln!("Error computing digest: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_resolve(a: &str, b: &str, config_path: Option<&Path>) {
    let seq = build_sequence(config_path);

    match seq.collection_for(a, b) {
        Some(name) => println!("{}", name),
        None => {
            eprintln!("No collection shared by '{}' and '{}'.", a, b);
            eprintln!("Known participants: {}", seq.participants().join(", "));
            process::exit(1);
        }
    }
}

fn run_verify(path: &Path, json_output: bool) {
    let report = match verify_file(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error verifying {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    if json_output {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", report.to_human());
    }

    if !report.is_clean() {
        process::exit(1);
    }
}
