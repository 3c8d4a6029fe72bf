//! Bothan Deploy - provision a Bothan metrics API on Heroku
//!
//! Usage:
//!   bothan-deploy deploy --name my-app --username u --password p --license CC-BY-4.0
//!   bothan-deploy deploy --params form.json
//!   bothan-deploy licenses

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bothan_deploy_core::config::{self, DeployConfig};
use bothan_deploy_core::deploy::{self, DeployOutcome, Terminal};
use bothan_deploy_core::license::LicenseTable;
use bothan_deploy_core::params::RawParams;

#[derive(Parser)]
#[command(name = "bothan-deploy")]
#[command(about = "Deploy a Bothan metrics API to Heroku", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/bothan-deploy/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the app, wait for the build and announce the result
    Deploy(Box<DeployArgs>),

    /// List license identifiers the deploy form accepts
    Licenses {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct DeployArgs {
    /// Heroku OAuth token of the user the app is created for
    #[arg(long, env = "HEROKU_OAUTH_TOKEN", hide_env_values = true)]
    token: String,
    /// JSON file with form fields (name, username, password, title,
    /// description, license, publisherName, publisherUrl)
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,
    /// App name
    #[arg(long)]
    name: Option<String>,
    /// Username for the metrics API
    #[arg(long)]
    username: Option<String>,
    /// Password for the metrics API
    #[arg(long)]
    password: Option<String>,
    /// Dashboard title
    #[arg(long)]
    title: Option<String>,
    /// Dashboard description
    #[arg(long)]
    description: Option<String>,
    /// License identifier (see `bothan-deploy licenses`)
    #[arg(long)]
    license: Option<String>,
    /// Publisher name
    #[arg(long)]
    publisher_name: Option<String>,
    /// Publisher URL
    #[arg(long)]
    publisher_url: Option<String>,
    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    format: OutputFormat,
}

impl DeployArgs {
    /// Form fields from `--params`, overlaid with individual flags
    fn raw_params(&self) -> Result<RawParams> {
        let mut raw = match &self.params {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read params file: {}", path.display()))?;
                RawParams::from_json(&content)
                    .with_context(|| format!("Failed to parse params file: {}", path.display()))?
            }
            None => RawParams::default(),
        };

        raw.merge(RawParams {
            name: self.name.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            license: self.license.clone(),
            publisher_name: self.publisher_name.clone(),
            publisher_url: self.publisher_url.clone(),
        });
        Ok(raw)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bothan_deploy=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Deploy(args) => run_deploy(&config, *args).await,
        Commands::Licenses { format } => run_licenses(&config, format),
    }
}

async fn run_deploy(config: &DeployConfig, args: DeployArgs) -> Result<()> {
    let raw = args.raw_params()?;
    tracing::debug!(params = ?raw, "deploy parameters");

    let outcome = deploy::perform(config, &args.token, &raw).await?;
    print_outcome(&outcome, args.format);

    if !outcome.terminal.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_outcome(outcome: &DeployOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let value = match &outcome.terminal {
                Terminal::Succeeded { url } => json!({
                    "id": outcome.id,
                    "status": "succeeded",
                    "url": url,
                    "polls": outcome.polls,
                }),
                Terminal::Failed { message } => json!({
                    "id": outcome.id,
                    "status": "failed",
                    "message": message,
                    "polls": outcome.polls,
                }),
            };
            println!("{}", value);
        }
        OutputFormat::Table => match &outcome.terminal {
            Terminal::Succeeded { url } => {
                println!("✓ App setup {} succeeded", outcome.id);
                println!("  URL:    {}", url);
                println!("  Checks: {}", outcome.polls);
            }
            Terminal::Failed { message } => {
                println!("✗ App setup {} failed", outcome.id);
                println!("  Reason: {}", message);
                println!("  Checks: {}", outcome.polls);
            }
        },
    }
}

fn run_licenses(config: &DeployConfig, format: OutputFormat) -> Result<()> {
    let table = LicenseTable::with_extras(&config.licenses);

    match format {
        OutputFormat::Json => {
            let licenses: Vec<_> = table.iter().collect();
            println!("{}", serde_json::to_string_pretty(&licenses)?);
        }
        OutputFormat::Table => {
            let width = table.iter().map(|l| l.id.len()).max().unwrap_or(0);
            for license in table.iter() {
                println!("{:width$}  {}", license.id, license.title, width = width);
                println!("{:width$}  {}", "", license.url, width = width);
            }
        }
    }
    Ok(())
}
