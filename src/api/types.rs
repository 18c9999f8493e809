// Configuration types

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactTable;

/// Default location of Hardhat contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts/contracts";

/// Environment variable holding the RPC endpoint
pub const RPC_URL_ENV: &str = "CONTRACTS_RPC_URL";

/// Settings shared by every validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// JSON-RPC endpoint to read from
    pub rpc_url: Option<String>,

    /// Directory the artifact table paths are relative to
    pub artifacts_dir: PathBuf,

    /// Entries added to (or overriding) the built-in artifact table
    pub extra_artifacts: ArtifactTable,

    /// Additional chain id → network name mappings
    pub network_names: BTreeMap<u64, String>,
}

impl ValidationConfig {
    /// Built-in table with `extra_artifacts` applied
    pub fn artifact_table(&self) -> ArtifactTable {
        let mut table = ArtifactTable::default();
        table.extend(self.extra_artifacts.clone());
        table
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            extra_artifacts: ArtifactTable::empty(),
            network_names: BTreeMap::new(),
        }
    }
}

/// Output format for the closing summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}
