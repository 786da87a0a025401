//! Posterbox CLI - Turn emailed poster images into a searchable archive

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Posterbox - Collect poster images from a mailbox, read them and tag them
#[derive(Parser)]
#[command(name = "posterbox")]
#[command(author = "Lalo Morales <lalomorales22@github.com>")]
#[command(version)]
#[command(about = "Collect poster images from a mailbox, read them and tag them", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest unseen messages, then export the archive
    Run {
        /// Skip the JSON export after ingesting
        #[arg(long)]
        no_export: bool,
    },

    /// Write the static JSON export
    Export {
        /// Output file (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show database statistics
    Stats,

    /// List all tags with poster counts
    Tags,

    /// Create a default config file and the database
    Init,

    /// Check that Tesseract and Ollama are reachable
    Check,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("posterbox=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("posterbox=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Run { no_export: false }) {
        Commands::Run { no_export } => commands::run::run(!no_export),
        Commands::Export { output } => commands::export::run(output),
        Commands::Stats => commands::stats::run(),
        Commands::Tags => commands::tags::run(),
        Commands::Init => commands::init::run(),
        Commands::Check => commands::check::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
