use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cryptick::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cryptick::AppCommand {
    fn from(cmd: Commands) -> cryptick::AppCommand {
        match cmd {
            Commands::Quotes => cryptick::AppCommand::Quotes,
            Commands::History { symbol } => cryptick::AppCommand::History { symbol },
            Commands::Limits => cryptick::AppCommand::Limits,
            Commands::Watch { symbol } => cryptick::AppCommand::Watch { symbol },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List tracked instruments with current prices
    Quotes,
    /// Display 30-day price history for a symbol (either BTC-USD or BTC/USD)
    History { symbol: String },
    /// Display API usage limits
    Limits,
    /// Live dashboard polling quotes and limits
    Watch {
        /// Also watch the 30-day history for this symbol
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => cryptick::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = cryptick::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
api:
  base_url: "http://localhost:8080/api"

feeds:
  quotes_interval_secs: 90
  limits_interval_secs: 30
  history_interval_secs: 300

watch:
  redraw_secs: 5
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
