//! Ledger event definitions and notification sinks
//!
//! Events are pure data describing a committed state change. The ledger
//! publishes them through an injected [`EventSink`]; the hosting runtime
//! decides whether they end up in a log, an index, or nowhere at all.

use crate::identity::Address;
use crate::ledger::{Amount, ClassId};
use std::cell::RefCell;
use std::rc::Rc;

/// One notification per mutating ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LedgerEvent {
    ClassCreated {
        class_id: ClassId,
        uri_suffix: String,
    },
    Minted {
        holder: Address,
        class_id: ClassId,
        amount: Amount,
        aux: Vec<u8>,
    },
    Burned {
        holder: Address,
        class_id: ClassId,
        amount: Amount,
    },
    BatchBurned {
        holder: Address,
        class_ids: Vec<ClassId>,
        amounts: Vec<Amount>,
    },
    Transferred {
        operator: Address,
        from: Address,
        to: Address,
        class_id: ClassId,
        amount: Amount,
        aux: Vec<u8>,
    },
    BatchTransferred {
        operator: Address,
        from: Address,
        to: Address,
        class_ids: Vec<ClassId>,
        amounts: Vec<Amount>,
        aux: Vec<u8>,
    },
    TransfersGateChanged {
        enabled: bool,
    },
    MarketGateChanged {
        enabled: bool,
    },
    NameChanged {
        old: String,
        new: String,
    },
    AdministratorChanged {
        old: Address,
        new: Address,
    },
}

impl LedgerEvent {
    /// Stable event name for logs and indexers.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::ClassCreated { .. } => "class_created",
            LedgerEvent::Minted { .. } => "minted",
            LedgerEvent::Burned { .. } => "burned",
            LedgerEvent::BatchBurned { .. } => "batch_burned",
            LedgerEvent::Transferred { .. } => "transferred",
            LedgerEvent::BatchTransferred { .. } => "batch_transferred",
            LedgerEvent::TransfersGateChanged { .. } => "transfers_gate_changed",
            LedgerEvent::MarketGateChanged { .. } => "market_gate_changed",
            LedgerEvent::NameChanged { .. } => "name_changed",
            LedgerEvent::AdministratorChanged { .. } => "administrator_changed",
        }
    }
}

/// Observer interface the ledger publishes through.
pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// Discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: LedgerEvent) {}
}

/// Records events into a shared buffer so tests can assert on the exact
/// sequence the ledger emitted.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<LedgerEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle onto the buffer that stays readable after the sink itself
    /// has been boxed and handed to the ledger.
    pub fn handle(&self) -> Rc<RefCell<Vec<LedgerEvent>>> {
        Rc::clone(&self.events)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Forwards events to the `tracing` log stream with a JSON payload.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: LedgerEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::info!(kind = event.kind(), %payload, "ledger event"),
            Err(e) => tracing::warn!(kind = event.kind(), "failed to encode ledger event: {}", e),
        }
    }
}
