use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runs_dashboard::config::{DashboardConfig, LogFormat, LoggingConfig};
use runs_dashboard::dashboard::rows::Layout;
use runs_dashboard::render::{self, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "runs-dashboard",
    about = "Dashboard for test runs recorded by a test management API",
    version,
    long_about = None
)]
struct Cli {
    /// Config file (defaults: $RUNS_DASHBOARD_CONFIG, ./runs-dashboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch test runs once and render them as a table
    Show {
        /// Base URL of the test management API
        #[arg(long, env = "RUNS_DASHBOARD_API_BASE")]
        api_base: Option<String>,

        /// Only show runs with this status
        #[arg(long)]
        status: Option<String>,

        /// Only show runs for this environment
        #[arg(long)]
        environment: Option<String>,

        /// Column layout
        #[arg(long, value_enum)]
        layout: Option<Layout>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig> {
    // Config loading logs before the configured subscriber exists.
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new("warn"))
        .finish();
    tracing::subscriber::with_default(bootstrap, || DashboardConfig::resolve(path))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Show {
            api_base,
            status,
            environment,
            layout,
            format,
            output,
        } => {
            if let Some(base) = api_base {
                config.api.base_url = base;
            }
            if status.is_some() {
                config.api.status = status;
            }
            if environment.is_some() {
                config.api.environment = environment;
            }
            if let Some(layout) = layout {
                config.render.layout = layout;
            }

            let mut surface = render::surface(format, &config.render);
            let state = runs_dashboard::show(&config, surface.as_mut()).await?;
            let rendered = surface.output()?;

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Wrote runs table");
                }
                None => print!("{}", rendered),
            }

            if state.is_failed() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config => {
            let toml_output = toml::to_string_pretty(&config)?;
            print!("{}", toml_output);
        }
    }

    Ok(ExitCode::SUCCESS)
}
