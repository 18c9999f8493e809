// Common types shared across the validator
//
// Bindings, network identity and the per-run session, plus the hex
// comparator every check goes through.

pub mod compare;
mod types;

pub use compare::{equal_hex, normalize_hex, to_hex};
pub use types::*;
