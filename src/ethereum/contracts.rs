// Typed views over the AddressDictator and Lib_AddressManager contracts

use ethers::abi::{Abi, Token};
use ethers::types::Address;

use crate::common::NamedBinding;
use crate::error::ChainError;
use crate::ethereum::ChainReader;

/// View functions of AddressDictator used for validation
pub const ADDRESS_DICTATOR_ABI: &str = r#"[
  {
    "type": "function",
    "name": "finalOwner",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [{ "name": "", "type": "address", "internalType": "address" }]
  },
  {
    "type": "function",
    "name": "manager",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [{ "name": "", "type": "address", "internalType": "contract Lib_AddressManager" }]
  },
  {
    "type": "function",
    "name": "getNamedAddresses",
    "stateMutability": "view",
    "inputs": [],
    "outputs": [
      {
        "name": "",
        "type": "tuple[]",
        "internalType": "struct AddressDictator.NamedAddress[]",
        "components": [
          { "name": "name", "type": "string", "internalType": "string" },
          { "name": "addr", "type": "address", "internalType": "address" }
        ]
      }
    ]
  }
]"#;

/// `getAddress` of Lib_AddressManager
pub const ADDRESS_MANAGER_ABI: &str = r#"[
  {
    "type": "function",
    "name": "getAddress",
    "stateMutability": "view",
    "inputs": [{ "name": "_name", "type": "string", "internalType": "string" }],
    "outputs": [{ "name": "", "type": "address", "internalType": "address" }]
  }
]"#;

fn parse_abi(json: &str) -> Result<Abi, ChainError> {
    Ok(serde_json::from_str(json)?)
}

fn unexpected(method: &str, reason: impl Into<String>) -> ChainError {
    ChainError::UnexpectedOutput {
        method: method.to_string(),
        reason: reason.into(),
    }
}

fn single_address(method: &str, tokens: Vec<Token>) -> Result<Address, ChainError> {
    match tokens.as_slice() {
        [Token::Address(address)] => Ok(*address),
        other => Err(unexpected(method, format!("expected one address, got {:?}", other))),
    }
}

/// Decode the output of `getNamedAddresses()`
pub fn decode_named_addresses(tokens: Vec<Token>) -> Result<Vec<NamedBinding>, ChainError> {
    const METHOD: &str = "getNamedAddresses";

    let items = match tokens.into_iter().next() {
        Some(Token::Array(items)) => items,
        other => return Err(unexpected(METHOD, format!("expected an array, got {:?}", other))),
    };

    items
        .into_iter()
        .map(|item| match item {
            Token::Tuple(fields) => match fields.as_slice() {
                [Token::String(name), Token::Address(address)] => {
                    Ok(NamedBinding::new(name.clone(), *address))
                }
                other => Err(unexpected(
                    METHOD,
                    format!("expected (string, address), got {:?}", other),
                )),
            },
            other => Err(unexpected(METHOD, format!("expected a tuple, got {:?}", other))),
        })
        .collect()
}

/// Deployed AddressDictator
pub struct AddressDictator<'a, C: ChainReader + ?Sized> {
    reader: &'a C,
    address: Address,
    abi: Abi,
}

impl<'a, C: ChainReader + ?Sized> AddressDictator<'a, C> {
    pub fn new(reader: &'a C, address: Address) -> Result<Self, ChainError> {
        Ok(Self {
            reader,
            address,
            abi: parse_abi(ADDRESS_DICTATOR_ABI)?,
        })
    }

    pub async fn final_owner(&self) -> Result<Address, ChainError> {
        let tokens = self
            .reader
            .call_read_only(self.address, &self.abi, "finalOwner", &[])
            .await?;
        single_address("finalOwner", tokens)
    }

    pub async fn manager(&self) -> Result<Address, ChainError> {
        let tokens = self
            .reader
            .call_read_only(self.address, &self.abi, "manager", &[])
            .await?;
        single_address("manager", tokens)
    }

    /// Bindings the dictator will stage, in contract order
    pub async fn named_addresses(&self) -> Result<Vec<NamedBinding>, ChainError> {
        let tokens = self
            .reader
            .call_read_only(self.address, &self.abi, "getNamedAddresses", &[])
            .await?;
        decode_named_addresses(tokens)
    }
}

/// Deployed Lib_AddressManager
pub struct AddressManager<'a, C: ChainReader + ?Sized> {
    reader: &'a C,
    address: Address,
    abi: Abi,
}

impl<'a, C: ChainReader + ?Sized> AddressManager<'a, C> {
    pub fn new(reader: &'a C, address: Address) -> Result<Self, ChainError> {
        Ok(Self {
            reader,
            address,
            abi: parse_abi(ADDRESS_MANAGER_ABI)?,
        })
    }

    /// Current address registered for `name`; zero when unset
    pub async fn get_address(&self, name: &str) -> Result<Address, ChainError> {
        let tokens = self
            .reader
            .call_read_only(
                self.address,
                &self.abi,
                "getAddress",
                &[Token::String(name.to_string())],
            )
            .await?;
        single_address("getAddress", tokens)
    }
}
