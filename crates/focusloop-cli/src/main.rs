use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod playback;

#[derive(Parser)]
#[command(name = "focusloop", version, about = "focusloop focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive focus session
    Run {
        /// Record playback instead of producing sound
        #[arg(long)]
        dry_run: bool,
    },
    /// Timer and sound settings
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Browse ambient tracks, reciters and recitation tracks
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Completed focus count and cycle position
    Stats,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run { dry_run } => commands::run::run(dry_run),
        Commands::Config { action } => commands::config::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Stats => commands::stats::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise the `[logging] level` from config.toml.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = focusloop_core::Config::load()
            .map(|config| config.logging.level)
            .unwrap_or_else(|_| "info".into());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
