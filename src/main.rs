use clap::{Parser, Subcommand};
use lognorm::config::{load_config, resolve_config_path, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lognorm")]
#[command(about = "Batch log normalization service", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP log processor
    Run,
    /// Normalize a batch from a file (or stdin) and print the result
    Transform {
        input: Option<PathBuf>,
        #[arg(long)]
        request_id: Option<String>,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());

    match cli.command {
        Some(Commands::Run) | None => {
            let config = lognorm::cli::run::load_or_default(config_path.as_deref())?;
            init_tracing(&config);
            lognorm::cli::run::run(config, config_path.as_deref()).await?;
        }
        Some(Commands::Transform { input, request_id }) => {
            let config = match &config_path {
                Some(path) => load_config(path)?,
                None => Config::default(),
            };
            init_tracing(&config);
            lognorm::cli::transform::run(input, request_id, &config)?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout } => {
                lognorm::cli::config::init(stdout)?;
            }
            ConfigAction::Validate => {
                lognorm::cli::config::validate(config_path)?;
            }
        },
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    // RUST_LOG wins over the config file
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
