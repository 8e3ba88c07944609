use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rowing_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rowing-cli", version, about = "Rowing history CLI")]
struct Cli {
    #[command(flatten)]
    location: Location,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for where the `Data` folder lives.
#[derive(Args, Clone, Default)]
pub struct Location {
    /// Directory containing the `Data` folder
    #[arg(long, global = true, conflicts_with = "data_dir")]
    project_dir: Option<PathBuf>,

    /// The data folder itself
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dataset menu
    Menu,
    /// Process one dataset
    Run(commands::run::RunArgs),
    /// Parse a log file without writing anything
    Parse(commands::parse::ParseArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool, config: &Config) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(cli.verbose, &config);

    let result = match cli.command {
        Commands::Menu => commands::run::menu(&config, &cli.location),
        Commands::Run(args) => commands::run::run(&config, &cli.location, args),
        Commands::Parse(args) => commands::parse::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
