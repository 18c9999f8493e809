// AddressDictator validation CLI
//
// Run by each signer before approving ownership transfer of an AddressManager
// to an AddressDictator.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use ethers::types::Address;
use log::error;

use dictator_verify::api::{
    ConfigBuilder, ConfigManager, DictatorValidator, ReportFormat, ReportFormatter,
    ValidationConfig, RPC_URL_ENV,
};
use dictator_verify::confirm::TerminalConfirmation;
use dictator_verify::reconcile::ReconcileRequest;
use dictator_verify::report::console::{paint, RED};
use dictator_verify::report::ConsoleReporter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "validate-dictator",
    about = "Validates an AddressDictator deployment against local build artifacts",
    version
)]
struct Args {
    /// Address of the AddressDictator to validate
    #[arg(long)]
    dictator: String,

    /// Address of the Address Manager contract which would be updated by the Dictator
    #[arg(long)]
    manager: String,

    /// Address of the multisig contract which should be the final owner
    #[arg(long)]
    multisig: String,

    /// RPC endpoint to query for data (defaults to $CONTRACTS_RPC_URL)
    #[arg(long)]
    contracts_rpc_url: Option<String>,

    /// Directory containing Hardhat contract artifacts
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment file to load before reading the environment
    #[arg(long)]
    env: Option<PathBuf>,

    /// Format of the closing summary
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn load_env(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("could not load environment file: {}", path.display());
            }
            dotenv::from_path(path)
                .with_context(|| format!("could not load environment file: {}", path.display()))?;
        }
        None => {
            // Load .env file if it exists
            dotenv::dotenv().ok();
        }
    }
    Ok(())
}

fn parse_address(label: &str, value: &str) -> Result<Address> {
    Address::from_str(value).map_err(|_| anyhow!("invalid {} address: {}", label, value))
}

/// CLI flag, then `env_rpc_url`, then whatever the config file holds
fn build_config(args: &Args, env_rpc_url: Option<String>) -> Result<ValidationConfig> {
    let base = match &args.config {
        Some(path) => {
            ConfigManager::load_from_file(path).context("Failed to load configuration")?
        }
        None => ValidationConfig::default(),
    };

    let mut builder = ConfigBuilder::from_config(base);
    let rpc_url = args.contracts_rpc_url.clone().or(env_rpc_url);
    if let Some(url) = rpc_url {
        builder = builder.rpc_url(url);
    }
    if let Some(dir) = &args.artifacts_dir {
        builder = builder.artifacts_dir(dir.clone());
    }
    Ok(builder.build())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG may come from the env file
    load_env(args.env.as_deref())?;
    env_logger::init();
    let config = build_config(&args, env::var(RPC_URL_ENV).ok())?;

    let request = ReconcileRequest {
        dictator: parse_address("dictator", &args.dictator)?,
        manager: parse_address("manager", &args.manager)?,
        expected_owner: parse_address("multisig", &args.multisig)?,
    };

    let validator = DictatorValidator::from_config(&config)?;
    let gate = TerminalConfirmation::stdio();
    let mut reporter = ConsoleReporter::stdout(None);

    let result = validator.validate(&request, &gate, &mut reporter).await;

    let summary = ReportFormatter::summarize(reporter.report(), result.as_ref().err());
    match ReportFormat::from(args.format) {
        ReportFormat::Text => println!("{}", ReportFormatter::to_text(&summary)),
        ReportFormat::Json => println!("{}", ReportFormatter::to_json(&summary)?),
    }

    if let Err(e) = result {
        error!("Validation failed: {}", e);
        return Err(anyhow!(paint(RED, &e.to_string())));
    }
    Ok(())
}
