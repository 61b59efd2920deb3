mod commands;
mod completer;
mod config;
mod format;
mod json_types;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::analyze::AnalyzeArgs;
use commands::classify::ClassifyArgs;
use commands::domain::DomainArgs;
use commands::normalize::NormalizeArgs;
use config::LogiscanConfig;

#[derive(Parser)]
#[command(name = "logiscan_cli")]
#[command(about = "Analyze one-variable logic formulas over a sampled numeric domain")]
#[command(version)]
struct Cli {
    /// Config file (default: ./logiscan.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize, classify and scan a formula over a domain
    Analyze(AnalyzeArgs),
    /// Print the normalized form of a formula
    Normalize(NormalizeArgs),
    /// Report predicate and quantifier metadata without evaluating
    Classify(ClassifyArgs),
    /// Validate a domain and list its grid points
    Domain(DomainArgs),
    /// Interactive session
    Repl,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = LogiscanConfig::load(cli.config.as_deref());

    match cli.command {
        Command::Analyze(args) => commands::analyze::run(args, &config),
        Command::Normalize(args) => commands::normalize::run(args),
        Command::Classify(args) => commands::classify::run(args, &config),
        Command::Domain(args) => commands::domain::run(args, &config),
        Command::Repl => match repl::Repl::new(&config).run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
