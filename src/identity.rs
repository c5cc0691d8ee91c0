//! Identity primitives for MintLedger
//!
//! The ledger never verifies signatures; the hosting runtime authenticates
//! callers and hands the ledger an already-trusted principal.

use crate::error::LedgerError;
use sha2::{Digest, Sha256};

/// Type alias for an account principal, which is a 32-byte hash.
/// We use a fixed-size array for internal type safety and performance.
pub type Address = [u8; 32];

/// Convenience function to create an address from a string (hashes the string).
/// Useful for testing and debugging.
pub fn address_from_string(s: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hasher.finalize().into()
}

/// Convert an address to a hex string for display.
pub fn address_to_hex(addr: &Address) -> String {
    hex::encode(addr)
}

/// Convert a hex string to an address.
pub fn address_from_hex(hex_str: &str) -> Result<Address, LedgerError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| LedgerError::InvalidAddress(format!("Invalid hex address: {}", e)))?;
    if bytes.len() != 32 {
        return Err(LedgerError::InvalidAddress(format!(
            "Address must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| LedgerError::InvalidAddress("Failed to convert bytes into address".to_string()))
}
