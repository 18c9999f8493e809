// Dictator Verify API Module
//
// Ties configuration, artifacts, the chain reader, the operator gate and the
// reconciliation engine into a single `DictatorValidator::validate` call.

mod config;
mod report;
mod types;

pub use config::*;
pub use report::*;
pub use types::*;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::artifact::ArtifactResolver;
use crate::common::SessionContext;
use crate::confirm::{establish_session, NetworkConfirmation};
use crate::error::ValidationError;
use crate::ethereum::{ChainReader, ChainRegistry, EthereumConnector};
use crate::reconcile::{ReconcileRequest, Reconciler};
use crate::report::Reporter;

/// Main API for validating an AddressDictator deployment
///
/// # Examples
///
/// ```no_run
/// use dictator_verify::api::{ConfigManager, DictatorValidator};
/// use dictator_verify::confirm::TerminalConfirmation;
/// use dictator_verify::reconcile::ReconcileRequest;
/// use dictator_verify::report::ConsoleReporter;
/// use ethers::types::Address;
///
/// # async fn run() -> anyhow::Result<()> {
/// let config = ConfigManager::builder()
///     .rpc_url("http://localhost:8545")
///     .build();
/// let validator = DictatorValidator::from_config(&config)?;
///
/// let request = ReconcileRequest {
///     dictator: Address::random(),
///     manager: Address::random(),
///     expected_owner: Address::random(),
/// };
/// let mut reporter = ConsoleReporter::stdout(None);
/// validator
///     .validate(&request, &TerminalConfirmation::stdio(), &mut reporter)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct DictatorValidator<C: ChainReader> {
    reader: C,
    resolver: ArtifactResolver,
}

impl DictatorValidator<EthereumConnector> {
    /// Connect to the configured endpoint and load every artifact
    pub fn from_config(config: &ValidationConfig) -> Result<Self> {
        let rpc_url = config
            .rpc_url
            .as_deref()
            .ok_or_else(|| anyhow!("{} not set in your env.", RPC_URL_ENV))?;

        let mut registry = ChainRegistry::new();
        for (chain_id, name) in &config.network_names {
            registry.add_network(*chain_id, name.clone());
        }
        let connector = EthereumConnector::new(rpc_url)
            .with_context(|| format!("invalid RPC URL {}", rpc_url))?
            .with_registry(registry);

        let table = config.artifact_table();
        let resolver = ArtifactResolver::load(&config.artifacts_dir, &table)
            .context("failed to load local build artifacts")?;
        info!(
            "Loaded {} artifacts from {:?}",
            resolver.len(),
            config.artifacts_dir
        );

        Ok(Self::new(connector, resolver))
    }
}

impl<C: ChainReader> DictatorValidator<C> {
    pub fn new(reader: C, resolver: ArtifactResolver) -> Self {
        Self { reader, resolver }
    }

    pub fn reader(&self) -> &C {
        &self.reader
    }

    /// Confirm the network with the operator, then reconcile
    pub async fn validate<G>(
        &self,
        request: &ReconcileRequest,
        gate: &G,
        reporter: &mut dyn Reporter,
    ) -> Result<SessionContext, ValidationError>
    where
        G: NetworkConfirmation + ?Sized,
    {
        let session = establish_session(&self.reader, gate).await?;
        reporter.session_started(session.network());

        Reconciler::new(&self.reader, &self.resolver, &session)
            .reconcile(request, reporter)
            .await?;
        Ok(session)
    }
}
