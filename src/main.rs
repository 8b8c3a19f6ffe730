use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use groqchat::connector::web;
use groqchat::{ChatModel, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "groqchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with an offline echo client instead of calling the API
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Ignore the environment and use the built-in configuration
    #[arg(long, global = true)]
    hardcoded_config: bool,

    /// Page title (overrides APP_NAME)
    #[arg(long, global = true)]
    app_name: Option<String>,

    /// Model preselected for new sessions (overrides MODEL_NAME)
    #[arg(long, global = true)]
    default_model: Option<String>,

    /// API root (overrides GROQ_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides GROQ_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Drop sessions idle for this many seconds (overrides SESSION_TTL_SECS)
    #[arg(long, global = true)]
    session_ttl: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn container_config(&self) -> Result<ContainerConfig> {
        let mut config = if self.hardcoded_config {
            ContainerConfig::default()
        } else {
            ContainerConfig::from_env()
        };

        if let Some(name) = &self.app_name {
            config.app_name = name.clone();
        }
        if let Some(model) = &self.default_model {
            config.default_model = model.parse::<ChatModel>()?;
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout.filter(|secs| *secs > 0) {
            config.timeout_secs = secs;
        }
        if let Some(secs) = self.session_ttl.filter(|secs| *secs > 0) {
            config.session_ttl_secs = secs;
        }
        config.mock_llm = self.mock_llm;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.container_config()?;
    if let Some(warning) = config.credential_warning() {
        warn!("{}", warning);
    }
    info!(
        "{} using {} (default model {})",
        config.app_name,
        if config.mock_llm { "mock client" } else { config.base_url.as_str() },
        config.default_model
    );

    let container = Arc::new(Container::new(config)?);

    match cli.command {
        Commands::Serve { port, public } => {
            let ip = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            let listener = TcpListener::bind((ip, port)).await?;
            web::serve(listener, container).await?;
        }
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
