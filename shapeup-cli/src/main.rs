//! Point d'entrée CLI pour shapeup

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;
mod config;

use cli::Commands;
use config::Config;

/// Géométries référencées : zones UTM, zones tampons et reprojection
#[derive(Parser)]
#[command(name = "shapeup")]
#[command(author, version)]
#[command(about = "Spatially referenced geometries: UTM zones, buffers and reprojection")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config preset name (default/km) or path to a JSON config
    #[arg(long, env = "SHAPEUP_CONFIG", default_value = "default", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Logs sur stderr : stdout porte le JSON
    init_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(&cli.config)?;
    debug!(config = %cli.config, "Configuration loaded");

    match cli.command {
        Commands::Utm { lat, lon } => cli::cmd_utm(lat, lon)?,
        Commands::Locate { x, y, sr } => cli::cmd_locate(x, y, &sr, &config)?,
        Commands::Buffer {
            lat,
            lon,
            distance,
            units,
        } => cli::cmd_buffer(lat, lon, distance, units.as_deref(), &config)?,
        Commands::Transform { input, sr, output } => {
            cli::cmd_transform(&input, &sr, output.as_deref(), &config)?
        }
        Commands::Version => cli::cmd_version()?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
