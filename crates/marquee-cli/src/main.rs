use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::AppConfig;

mod commands;

use commands::simulate::{OutputFormat, SimulateArgs};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "A terminal certificate carousel with a seamless continuous loop")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file (defaults to ~/.config/marquee/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Run the loop engine without a terminal UI and print its trajectory
    Simulate {
        /// Loop period (half the doubled track length)
        #[arg(short = 'p', long, default_value_t = 1000.0)]
        period: f64,
        /// Velocity in period units per second
        #[arg(short = 'v', long, default_value_t = 120.0)]
        velocity: f64,
        /// Total seconds to simulate
        #[arg(short = 'd', long, default_value_t = 25.0)]
        duration: f64,
        /// Seconds between printed samples
        #[arg(short = 's', long, default_value_t = 1.0)]
        step: f64,
        /// Pause at this many seconds
        #[arg(long)]
        pause_at: Option<f64>,
        /// Resume at this many seconds
        #[arg(long)]
        resume_at: Option<f64>,
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Follow real time instead of stepping a simulated clock
        #[arg(long)]
        realtime: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; `config path` and `config init` still work when it is broken
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let log_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "warn".into());

    // Initialize logging on stderr so simulate output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(log_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(loaded?).await,
        Some(Commands::Simulate {
            period,
            velocity,
            duration,
            step,
            pause_at,
            resume_at,
            format,
            realtime,
        }) => {
            let args = SimulateArgs {
                period,
                velocity,
                duration,
                step,
                pause_at,
                resume_at,
                format,
            };
            if realtime {
                commands::simulate::run_realtime(&args, &mut std::io::stdout()).await
            } else {
                commands::simulate::run(&args, &mut std::io::stdout())
            }
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Show => commands::config::show(&loaded?),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
        },
    }
}
