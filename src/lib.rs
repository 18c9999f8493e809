// Dictator Verify
//
// Validates an AddressDictator deployment before its owner hands it the keys
// to a live Lib_AddressManager: the dictator's own code, its configured owner
// and manager, and the bytecode behind every name whose address will change.

pub mod api;
pub mod artifact;
pub mod common;
pub mod confirm;
pub mod error;
pub mod ethereum;
pub mod reconcile;
pub mod report;

pub use error::{ChainError, ValidationError};
