//! Snapshot layer: capture, serialize, and fingerprint the ledger state
//!
//! Persistence engines are a hosting-runtime concern; this module only
//! defines what a persisted ledger must contain and a stable binary
//! encoding for it.

use crate::error::LedgerError;
use crate::ledger::LedgerState;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// A point-in-time capture of everything the ledger needs to resume:
/// administrator identity, name, base metadata locator, the ordered class
/// registry, the sparse balance table, and the two gate flags.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LedgerSnapshot {
    pub saved_at: DateTime<Utc>,
    pub state: LedgerState,
}

impl LedgerSnapshot {
    pub fn capture(state: &LedgerState) -> Self {
        LedgerSnapshot {
            saved_at: Utc::now(),
            state: state.clone(),
        }
    }

    /// Write the bincode-encoded snapshot, creating parent directories as
    /// needed.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let encoded = bincode::serialize(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, encoded)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let bytes = fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

/// SHA-256 fingerprint of the state's bincode encoding. Deterministic:
/// every map inside `LedgerState` is ordered, so equal states always hash
/// equal.
pub fn state_digest(state: &LedgerState) -> Result<[u8; 32], LedgerError> {
    let encoded = bincode::serialize(state)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::address_from_string;
    use crate::ledger::TokenLedger;

    fn sample_ledger() -> TokenLedger {
        let admin = address_from_string("admin");
        let mut ledger = TokenLedger::new(admin, "Sample", "ipfs://base/").unwrap();
        ledger.create_token_class(admin, "a.json").unwrap();
        ledger
            .mint(admin, address_from_string("holder"), 0, 100, b"")
            .unwrap();
        ledger
    }

    #[test]
    fn test_digest_is_deterministic() {
        let ledger = sample_ledger();
        let d1 = state_digest(ledger.state()).unwrap();
        let d2 = state_digest(ledger.state()).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(hex::encode(d1).len(), 64);
    }

    #[test]
    fn test_digest_changes_with_state() {
        let mut ledger = sample_ledger();
        let admin = ledger.administrator();
        let before = state_digest(ledger.state()).unwrap();
        ledger
            .mint(admin, address_from_string("holder"), 0, 1, b"")
            .unwrap();
        let after = state_digest(ledger.state()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_snapshot_encoding_round_trip() {
        let ledger = sample_ledger();
        let snapshot = LedgerSnapshot::capture(ledger.state());
        let encoded = bincode::serialize(&snapshot).unwrap();
        let decoded: LedgerSnapshot = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded.state, *ledger.state());
    }
}
