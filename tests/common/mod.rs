// In-memory chain shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::types::{Address, Bytes, H160};
use hex_literal::hex;

use dictator_verify::artifact::{Artifact, ArtifactResolver, DICTATOR_ARTIFACT};
use dictator_verify::common::{to_hex, NamedBinding, NetworkIdentity, SessionContext};
use dictator_verify::confirm::establish_session;
use dictator_verify::ethereum::ChainReader;
use dictator_verify::ChainError;

pub const DICTATOR: Address = H160([0xd1; 20]);
pub const MANAGER: Address = H160([0xa4; 20]);
pub const MULTISIG: Address = H160([0x5f; 20]);

pub const CTC_OLD: Address = H160([0x01; 20]);
pub const CTC_NEW: Address = H160([0x02; 20]);
pub const SCC_OLD: Address = H160([0x03; 20]);
pub const SCC_NEW: Address = H160([0x04; 20]);
pub const BOND_MANAGER: Address = H160([0x05; 20]);

pub const DICTATOR_CODE: [u8; 6] = hex!("6080604052d1");
pub const CTC_CODE: [u8; 6] = hex!("60806040520c");
pub const SCC_CODE: [u8; 6] = hex!("60806040525c");
pub const BOND_MANAGER_CODE: [u8; 6] = hex!("60806040520b");

/// A chain read, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Read {
    Network,
    Code(Address),
    Call(String),
    GetAddress(String),
}

pub struct MockChain {
    pub network: NetworkIdentity,
    pub code: HashMap<Address, Bytes>,
    pub final_owner: Address,
    pub manager_pointer: Address,
    pub staged: Vec<NamedBinding>,
    pub current: HashMap<String, Address>,
    pub failing_method: Option<String>,
    reads: Mutex<Vec<Read>>,
}

impl MockChain {
    /// Dictator, owner and manager all check out; every staged binding is
    /// already live in the manager
    pub fn healthy() -> Self {
        let staged = vec![
            NamedBinding::new("CanonicalTransactionChain", CTC_OLD),
            NamedBinding::new("StateCommitmentChain", SCC_OLD),
            NamedBinding::new("BondManager", BOND_MANAGER),
        ];
        let current = staged
            .iter()
            .map(|b| (b.name.clone(), b.address))
            .collect();

        let mut code = HashMap::new();
        code.insert(DICTATOR, Bytes::from(DICTATOR_CODE.to_vec()));
        code.insert(CTC_OLD, Bytes::from(CTC_CODE.to_vec()));
        code.insert(SCC_OLD, Bytes::from(SCC_CODE.to_vec()));
        code.insert(BOND_MANAGER, Bytes::from(BOND_MANAGER_CODE.to_vec()));

        Self {
            network: NetworkIdentity {
                name: "goerli".to_string(),
                chain_id: 5,
            },
            code,
            final_owner: MULTISIG,
            manager_pointer: MANAGER,
            staged,
            current,
            failing_method: None,
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Stage `name` at `address`, deploying `code` there
    pub fn stage(&mut self, name: &str, address: Address, code: &[u8]) {
        for binding in self.staged.iter_mut().filter(|b| b.name == name) {
            binding.address = address;
        }
        if !self.staged.iter().any(|b| b.name == name) {
            self.staged.push(NamedBinding::new(name, address));
        }
        self.code.insert(address, Bytes::from(code.to_vec()));
    }

    pub fn reads(&self) -> Vec<Read> {
        self.reads.lock().unwrap().clone()
    }

    pub fn code_reads(&self) -> Vec<Address> {
        self.reads()
            .into_iter()
            .filter_map(|r| match r {
                Read::Code(address) => Some(address),
                _ => None,
            })
            .collect()
    }

    pub fn has_read(&self, read: &Read) -> bool {
        self.reads().contains(read)
    }

    fn log(&self, read: Read) {
        self.reads.lock().unwrap().push(read);
    }

    fn fail_if_configured(&self, method: &str) -> Result<(), ChainError> {
        if self.failing_method.as_deref() == Some(method) {
            return Err(ChainError::UnexpectedOutput {
                method: method.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn network_identity(&self) -> Result<NetworkIdentity, ChainError> {
        self.log(Read::Network);
        Ok(self.network.clone())
    }

    async fn deployed_code(&self, address: Address) -> Result<Bytes, ChainError> {
        self.log(Read::Code(address));
        self.fail_if_configured("getCode")?;
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }

    async fn call_read_only(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, ChainError> {
        // reject methods the ABI does not declare, like a real node would
        abi.function(method)?;

        match (contract, method, args) {
            (c, "getAddress", [Token::String(name)]) if c == MANAGER => {
                self.log(Read::GetAddress(name.clone()));
                self.fail_if_configured(method)?;
                let current = self.current.get(name).copied().unwrap_or_default();
                Ok(vec![Token::Address(current)])
            }
            (c, "finalOwner", []) if c == DICTATOR => {
                self.log(Read::Call(method.to_string()));
                self.fail_if_configured(method)?;
                Ok(vec![Token::Address(self.final_owner)])
            }
            (c, "manager", []) if c == DICTATOR => {
                self.log(Read::Call(method.to_string()));
                self.fail_if_configured(method)?;
                Ok(vec![Token::Address(self.manager_pointer)])
            }
            (c, "getNamedAddresses", []) if c == DICTATOR => {
                self.log(Read::Call(method.to_string()));
                self.fail_if_configured(method)?;
                let items = self
                    .staged
                    .iter()
                    .map(|b| {
                        Token::Tuple(vec![
                            Token::String(b.name.clone()),
                            Token::Address(b.address),
                        ])
                    })
                    .collect();
                Ok(vec![Token::Array(items)])
            }
            _ => Err(ChainError::UnexpectedOutput {
                method: method.to_string(),
                reason: format!("no contract at {:?} answers this call", contract),
            }),
        }
    }
}

/// Artifacts matching the code `MockChain::healthy` deploys
pub fn resolver() -> ArtifactResolver {
    ArtifactResolver::from_artifacts(vec![
        Artifact::new(DICTATOR_ARTIFACT, to_hex(&DICTATOR_CODE)),
        Artifact::new("CanonicalTransactionChain", to_hex(&CTC_CODE)),
        // artifacts often carry upper-case hex without the prefix
        Artifact::new("StateCommitmentChain", hex::encode_upper(SCC_CODE)),
        Artifact::new("BondManager", to_hex(&BOND_MANAGER_CODE)),
    ])
}

/// Session approved by a stub operator
pub async fn approved_session(chain: &MockChain) -> SessionContext {
    establish_session(chain, &|_: &NetworkIdentity| true)
        .await
        .expect("stub operator approves")
}
