// Network naming
//
// JSON-RPC only reports a chain id; operators are shown the conventional
// network name for it so a wrong endpoint is easy to spot.

use std::collections::HashMap;

/// Name used for chain ids the registry does not know
pub const UNKNOWN_NETWORK: &str = "unknown";

/// Chain id → network name lookup
pub struct ChainRegistry {
    names: HashMap<u64, String>,
}

impl ChainRegistry {
    /// Create a registry with the well-known networks
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.add_network(1, "homestead");
        registry.add_network(3, "ropsten");
        registry.add_network(4, "rinkeby");
        registry.add_network(5, "goerli");
        registry.add_network(42, "kovan");
        registry.add_network(11155111, "sepolia");
        registry.add_network(10, "optimism");
        registry.add_network(69, "optimism-kovan");
        registry.add_network(420, "optimism-goerli");
        registry.add_network(42161, "arbitrum");
        registry
    }

    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Add or rename a network
    pub fn add_network(&mut self, chain_id: u64, name: impl Into<String>) {
        self.names.insert(chain_id, name.into());
    }

    /// Name for `chain_id`, or `unknown`
    pub fn network_name(&self, chain_id: u64) -> String {
        self.names
            .get(&chain_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NETWORK.to_string())
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
