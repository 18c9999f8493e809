// Ethereum chain access
//
// The validator only ever reads from the chain: network identity, deployed
// code and `eth_call`s against view functions. `ChainReader` is that narrow
// surface; `EthereumConnector` implements it over JSON-RPC.

pub mod chain;
pub mod contracts;

pub use chain::ChainRegistry;
pub use contracts::{AddressDictator, AddressManager};

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, U256};
use log::debug;

use crate::common::NetworkIdentity;
use crate::error::ChainError;

/// Read-only view of a remote chain
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Name and chain id of the network behind the endpoint
    async fn network_identity(&self) -> Result<NetworkIdentity, ChainError>;

    /// Runtime code at `address`; empty when there is no contract
    async fn deployed_code(&self, address: Address) -> Result<Bytes, ChainError>;

    /// Call the view function `method` of `contract`
    async fn call_read_only(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, ChainError>;
}

/// JSON-RPC connection to an Ethereum node
pub struct EthereumConnector {
    provider: Arc<Provider<Http>>,
    registry: ChainRegistry,
}

impl EthereumConnector {
    /// Create new Ethereum connector
    pub fn new(rpc_url: &str) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        Ok(Self {
            provider: Arc::new(provider),
            registry: ChainRegistry::new(),
        })
    }

    /// Use a custom registry for network names
    pub fn with_registry(mut self, registry: ChainRegistry) -> Self {
        self.registry = registry;
        self
    }
}

#[async_trait]
impl ChainReader for EthereumConnector {
    async fn network_identity(&self) -> Result<NetworkIdentity, ChainError> {
        let chain_id = self.provider.get_chainid().await?;
        if chain_id > U256::from(u64::MAX) {
            return Err(ChainError::UnexpectedOutput {
                method: "eth_chainId".to_string(),
                reason: format!("chain id {} does not fit in 64 bits", chain_id),
            });
        }
        let chain_id = chain_id.as_u64();
        debug!("Endpoint reports chain id {}", chain_id);

        Ok(NetworkIdentity {
            name: self.registry.network_name(chain_id),
            chain_id,
        })
    }

    async fn deployed_code(&self, address: Address) -> Result<Bytes, ChainError> {
        let code = self.provider.get_code(address, None).await?;
        debug!("Fetched {} bytes of code at {:?}", code.len(), address);
        Ok(code)
    }

    async fn call_read_only(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, ChainError> {
        let function = abi.function(method)?;
        let data = function.encode_input(args)?;
        let tx: TypedTransaction = TransactionRequest::new().to(contract).data(data).into();

        debug!("eth_call {}() on {:?}", method, contract);
        let output = self.provider.call(&tx, None).await?;
        Ok(function.decode_output(&output)?)
    }
}
