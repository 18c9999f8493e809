// Local build artifacts
//
// The artifact table maps a logical contract name to a Hardhat artifact file
// under the artifacts directory. All artifacts are read once at startup;
// `resolve` never touches the filesystem.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Artifact name of the dictator contract itself
pub const DICTATOR_ARTIFACT: &str = "AddressDictator";

/// Logical name → artifact path, relative to the artifacts directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactTable(BTreeMap<String, PathBuf>);

impl ArtifactTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.0.insert(name.into(), path.into());
    }

    /// Merge `other` into this table, overriding existing names
    pub fn extend(&mut self, other: ArtifactTable) {
        self.0.extend(other.0);
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.0.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl Default for ArtifactTable {
    /// Contracts managed by the Optimism L1 AddressDictator
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(
            DICTATOR_ARTIFACT,
            "L1/deployment/AddressDictator.sol/AddressDictator.json",
        );
        table.insert(
            "ChainStorageContainer_CTC_batches",
            "L1/rollup/ChainStorageContainer.sol/ChainStorageContainer.json",
        );
        table.insert(
            "ChainStorageContainer_SCC_batches",
            "L1/rollup/ChainStorageContainer.sol/ChainStorageContainer.json",
        );
        table.insert(
            "CanonicalTransactionChain",
            "L1/rollup/CanonicalTransactionChain.sol/CanonicalTransactionChain.json",
        );
        table.insert(
            "StateCommitmentChain",
            "L1/rollup/StateCommitmentChain.sol/StateCommitmentChain.json",
        );
        table.insert(
            "BondManager",
            "L1/verification/BondManager.sol/BondManager.json",
        );
        table.insert(
            "OVM_L1CrossDomainMessenger",
            "L1/messaging/L1CrossDomainMessenger.sol/L1CrossDomainMessenger.json",
        );
        table.insert(
            "Proxy__OVM_L1CrossDomainMessenger",
            "libraries/resolver/Lib_ResolvedDelegateProxy.sol/Lib_ResolvedDelegateProxy.json",
        );
        table.insert(
            "Proxy__OVM_L1StandardBridge",
            "chugsplash/L1ChugSplashProxy.sol/L1ChugSplashProxy.json",
        );
        table
    }
}

/// Trusted build output for one logical contract name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    /// Runtime bytecode, hex encoded
    pub deployed_bytecode: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, deployed_bytecode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deployed_bytecode: deployed_bytecode.into(),
        }
    }
}

// Only the field we need out of a Hardhat artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    deployed_bytecode: String,
}

/// Resolves logical names to pre-loaded artifacts
#[derive(Debug, Clone, Default)]
pub struct ArtifactResolver {
    artifacts: HashMap<String, Artifact>,
}

impl ArtifactResolver {
    /// Read every artifact named in `table` from `artifacts_dir`
    pub fn load<P: AsRef<Path>>(
        artifacts_dir: P,
        table: &ArtifactTable,
    ) -> Result<Self, ValidationError> {
        let dir = artifacts_dir.as_ref();
        let mut by_path: HashMap<PathBuf, String> = HashMap::new();
        let mut artifacts = HashMap::with_capacity(table.len());

        for (name, relative) in table.iter() {
            let path = dir.join(relative);
            let bytecode = match by_path.get(&path) {
                Some(code) => code.clone(),
                None => {
                    let code = read_deployed_bytecode(&path)?;
                    debug!("Loaded artifact {} from {:?}", name, path);
                    by_path.insert(path.clone(), code.clone());
                    code
                }
            };
            artifacts.insert(name.to_string(), Artifact::new(name, bytecode));
        }

        Ok(Self { artifacts })
    }

    /// Build a resolver from records that are already in memory
    pub fn from_artifacts<I>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = Artifact>,
    {
        Self {
            artifacts: artifacts
                .into_iter()
                .map(|artifact| (artifact.name.clone(), artifact))
                .collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&Artifact, ValidationError> {
        self.artifacts
            .get(name)
            .ok_or_else(|| ValidationError::UnknownArtifact(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

fn read_deployed_bytecode(path: &Path) -> Result<String, ValidationError> {
    let load_error = |reason: String| ValidationError::ArtifactLoad {
        path: path.to_path_buf(),
        reason,
    };
    let contents = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let artifact: HardhatArtifact =
        serde_json::from_str(&contents).map_err(|e| load_error(e.to_string()))?;
    Ok(artifact.deployed_bytecode)
}
