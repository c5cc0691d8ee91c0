//! Hosting-runtime shim
//!
//! The ledger itself is transport-, storage-, and identity-agnostic. This
//! module wires the pieces a minimal host needs: config loading, snapshot
//! restore and checkpointing, structured logging, and the collaborator
//! trait for recipient receive-hooks.

use crate::config::Config;
use crate::error::LedgerError;
use crate::events::{EventSink, LedgerEvent, TracingSink};
use crate::identity::Address;
use crate::ledger::{Amount, ClassId, LedgerState, TokenLedger};
use crate::snapshot::{state_digest, LedgerSnapshot};
use std::path::PathBuf;
use tracing::{info, warn};

/// Hook a hosting runtime may invoke when an account receives balances,
/// carrying the opaque `aux` bytes from the mint or transfer that produced
/// them. `from` is `None` for a mint. The ledger never calls this itself and
/// never alters state based on the outcome; a rejection is an external
/// failure for the runtime to surface.
pub trait ReceiveHook {
    fn on_received(
        &mut self,
        from: Option<&Address>,
        holder: &Address,
        class_id: ClassId,
        amount: Amount,
        aux: &[u8],
    ) -> Result<(), String>;
}

/// Invoke `hook` once per balance credit described by a committed event.
/// Events that credit nobody dispatch nothing. The state behind the event
/// has already committed; a rejection is returned for the runtime to
/// surface and must not be read as a rollback.
pub fn dispatch_receive_hook(
    hook: &mut dyn ReceiveHook,
    event: &LedgerEvent,
) -> Result<(), String> {
    match event {
        LedgerEvent::Minted {
            holder,
            class_id,
            amount,
            aux,
        } => hook.on_received(None, holder, *class_id, *amount, aux),
        LedgerEvent::Transferred {
            from,
            to,
            class_id,
            amount,
            aux,
            ..
        } => hook.on_received(Some(from), to, *class_id, *amount, aux),
        LedgerEvent::BatchTransferred {
            from,
            to,
            class_ids,
            amounts,
            aux,
            ..
        } => {
            for (class_id, amount) in class_ids.iter().zip(amounts) {
                hook.on_received(Some(from), to, *class_id, *amount, aux)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// One ledger instance plus the snapshot path it checkpoints to. Callers are
/// expected to serialize access; nothing here suspends or blocks.
pub struct LedgerRuntime {
    ledger: TokenLedger,
    snapshot_path: PathBuf,
}

impl LedgerRuntime {
    /// Bring a ledger up from config: restore the snapshot when one is
    /// readable, otherwise start fresh with the configured identity, name,
    /// and gate positions.
    pub fn start(config: &Config) -> Result<Self, LedgerError> {
        init_logging();

        let administrator = config.administrator_address()?;
        let snapshot_path = PathBuf::from(&config.snapshot.path);
        let sink: Box<dyn EventSink> = Box::new(TracingSink);

        let ledger = match LedgerSnapshot::load(&snapshot_path) {
            Ok(snapshot) => {
                info!(
                    "Restored ledger '{}' from {}",
                    snapshot.state.name,
                    snapshot_path.display()
                );
                TokenLedger::from_state(snapshot.state, sink)
            }
            Err(e) => {
                warn!(
                    "No usable snapshot at {}: {}. Starting with a fresh ledger.",
                    snapshot_path.display(),
                    e
                );
                let mut state =
                    LedgerState::new(administrator, &config.ledger.name, &config.ledger.base_uri);
                state.transfers_enabled = config.gates.transfers_enabled;
                state.market_enabled = config.gates.market_enabled;
                TokenLedger::from_state(state, sink)
            }
        };

        info!(
            "Ledger '{}' ready (administrator {})",
            ledger.name(),
            crate::identity::address_to_hex(&ledger.administrator())
        );

        Ok(LedgerRuntime {
            ledger,
            snapshot_path,
        })
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut TokenLedger {
        &mut self.ledger
    }

    /// Capture and persist the current state, logging its digest.
    pub fn checkpoint(&self) -> Result<(), LedgerError> {
        let snapshot = LedgerSnapshot::capture(self.ledger.state());
        snapshot.save(&self.snapshot_path)?;
        let digest = state_digest(self.ledger.state())?;
        info!(
            "Checkpointed ledger to {} (digest {})",
            self.snapshot_path.display(),
            hex::encode(digest)
        );
        Ok(())
    }
}

fn init_logging() {
    // Embedding hosts and test harnesses may have installed a subscriber
    // already; a second init is not an error worth surfacing.
    let _ = tracing_subscriber::fmt::try_init();
}
