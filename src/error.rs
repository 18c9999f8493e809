// Error types for dictator validation

use std::path::PathBuf;

use ethers::providers::ProviderError;
use ethers::types::Address;
use thiserror::Error;

use crate::report::Subject;

/// Failure of a read against the remote chain
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Transport(#[from] ProviderError),
    #[error("ABI error: {0}")]
    Abi(#[from] ethers::abi::Error),
    #[error("invalid ABI definition: {0}")]
    InvalidAbi(#[from] serde_json::Error),
    #[error("unexpected output from {method}: {reason}")]
    UnexpectedOutput { method: String, reason: String },
}

/// Every way a validation run can fail. All of them are fatal.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("User indicated that validation was run against the wrong chain ({network}, chain id {chain_id})")]
    UnapprovedNetwork { network: String, chain_id: u64 },

    #[error("no local build artifact is registered for `{0}`")]
    UnknownArtifact(String),

    #[error("{subject} looks wrong: deployed code does not match the local build artifact")]
    BytecodeMismatch { subject: Subject },

    #[error("{subject} looks wrong: expected {expected:?}, found {actual:?}")]
    AddressMismatch {
        subject: Subject,
        expected: Address,
        actual: Address,
    },

    #[error("failed to read {what} from the chain: {source}")]
    RemoteReadFailure {
        what: String,
        #[source]
        source: ChainError,
    },

    #[error("could not load artifact {path:?}: {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },
}

impl ValidationError {
    /// Wrap a chain read failure, naming what was being read
    pub fn remote(what: impl Into<String>, source: ChainError) -> Self {
        Self::RemoteReadFailure {
            what: what.into(),
            source,
        }
    }
}
