use std::fmt;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// One name→address entry, either staged in the dictator or live in the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedBinding {
    /// Logical contract name, e.g. `CanonicalTransactionChain`
    pub name: String,
    /// Address the name points at
    pub address: Address,
}

impl NamedBinding {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Name and chain id reported by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentity {
    pub name: String,
    pub chain_id: u64,
}

impl fmt::Display for NetworkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain id {})", self.name, self.chain_id)
    }
}

/// Per-run context. Only `confirm::establish_session` hands out an approved one.
#[derive(Debug, Clone)]
pub struct SessionContext {
    network: NetworkIdentity,
    operator_approved: bool,
}

impl SessionContext {
    pub(crate) fn new(network: NetworkIdentity, operator_approved: bool) -> Self {
        Self {
            network,
            operator_approved,
        }
    }

    pub fn network_name(&self) -> &str {
        &self.network.name
    }

    pub fn chain_id(&self) -> u64 {
        self.network.chain_id
    }

    pub fn network(&self) -> &NetworkIdentity {
        &self.network
    }

    pub fn operator_approved(&self) -> bool {
        self.operator_approved
    }
}
