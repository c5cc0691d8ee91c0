use crate::error::LedgerError;
use crate::events::{EventSink, LedgerEvent, NullSink};
use crate::identity::Address;
use crate::ledger::core::authorize::{authorize, Role};
use crate::ledger::core::state::{Amount, ClassId, LedgerState, TokenClass};

/// The ledger state machine: owns the class registry, the balance table and
/// the global gate flags, and enforces every authorization and invariant
/// check before mutating them.
///
/// Each operation runs as one synchronous, atomic unit. Batch operations
/// stage their mutations on a scratch copy of the balance table and commit
/// it only once every element has validated, so a failing element leaves no
/// partial state behind. Events reach the injected sink strictly after the
/// state change they describe has committed.
pub struct TokenLedger {
    state: LedgerState,
    sink: Box<dyn EventSink>,
}

impl std::fmt::Debug for TokenLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenLedger")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TokenLedger {
    /// Create a fresh ledger with no notification sink attached.
    pub fn new(administrator: Address, name: &str, base_uri: &str) -> Result<Self, LedgerError> {
        Self::with_sink(administrator, name, base_uri, Box::new(NullSink))
    }

    /// Create a fresh ledger publishing events to `sink`.
    pub fn with_sink(
        administrator: Address,
        name: &str,
        base_uri: &str,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, LedgerError> {
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        Ok(TokenLedger {
            state: LedgerState::new(administrator, name, base_uri),
            sink,
        })
    }

    /// Rehydrate a ledger from previously captured state (snapshot restore).
    pub fn from_state(state: LedgerState, sink: Box<dyn EventSink>) -> Self {
        TokenLedger { state, sink }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn administrator(&self) -> Address {
        self.state.administrator
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn base_uri(&self) -> &str {
        &self.state.base_uri
    }

    pub fn transfers_enabled(&self) -> bool {
        self.state.transfers_enabled
    }

    pub fn market_enabled(&self) -> bool {
        self.state.market_enabled
    }

    /// Number of classes ever created; ids below this value exist.
    pub fn class_count(&self) -> u64 {
        self.state.classes.len() as u64
    }

    pub fn balance_of(&self, holder: &Address, class_id: ClassId) -> Amount {
        self.state.balances.get(holder, class_id)
    }

    /// Total of one class across all holders. Changes only via mint and burn.
    pub fn class_supply(&self, class_id: ClassId) -> Amount {
        self.state.balances.class_supply(class_id)
    }

    /// Full metadata locator for a class: the ledger-wide base locator
    /// concatenated with the class's suffix.
    pub fn resolve_metadata(&self, class_id: ClassId) -> Result<String, LedgerError> {
        let class = self
            .state
            .classes
            .get(class_id as usize)
            .ok_or(LedgerError::UnknownTokenClass(class_id))?;
        Ok(format!("{}{}", self.state.base_uri, class.uri_suffix))
    }

    // ------------------------------------------------------------------
    // Class registry
    // ------------------------------------------------------------------

    /// Register a new token class under the next sequential id.
    ///
    /// The returned id is the one recorded on the class and carried by the
    /// `ClassCreated` event.
    pub fn create_token_class(
        &mut self,
        caller: Address,
        uri_suffix: &str,
    ) -> Result<ClassId, LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        let class_id = self.state.classes.len() as ClassId;
        self.state.classes.push(TokenClass {
            id: class_id,
            uri_suffix: uri_suffix.to_string(),
        });
        self.emit(LedgerEvent::ClassCreated {
            class_id,
            uri_suffix: uri_suffix.to_string(),
        });
        Ok(class_id)
    }

    // ------------------------------------------------------------------
    // Mint
    // ------------------------------------------------------------------

    /// Credit `amount` of an existing class to `holder`. The `aux` bytes are
    /// opaque passthrough for the runtime's receive hooks and never affect
    /// ledger state.
    pub fn mint(
        &mut self,
        caller: Address,
        holder: Address,
        class_id: ClassId,
        amount: Amount,
        aux: &[u8],
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        if !self.state.class_exists(class_id) {
            return Err(LedgerError::UnknownTokenClass(class_id));
        }
        self.state.balances.credit(holder, class_id, amount)?;
        self.emit(LedgerEvent::Minted {
            holder,
            class_id,
            amount,
            aux: aux.to_vec(),
        });
        Ok(())
    }

    /// Mint to many (holder, class, amount) triples at once, all-or-nothing.
    pub fn bulk_mint(
        &mut self,
        caller: Address,
        holders: &[Address],
        class_ids: &[ClassId],
        amounts: &[Amount],
        aux: &[u8],
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        check_lengths(holders.len(), class_ids.len())?;
        check_lengths(class_ids.len(), amounts.len())?;

        let mut staged = self.state.balances.clone();
        for i in 0..holders.len() {
            if !self.state.class_exists(class_ids[i]) {
                return Err(LedgerError::UnknownTokenClass(class_ids[i]));
            }
            staged.credit(holders[i], class_ids[i], amounts[i])?;
        }
        self.state.balances = staged;

        for i in 0..holders.len() {
            self.emit(LedgerEvent::Minted {
                holder: holders[i],
                class_id: class_ids[i],
                amount: amounts[i],
                aux: aux.to_vec(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Burn
    // ------------------------------------------------------------------

    /// Self-service burn: the caller destroys part of its own balance.
    pub fn burn(
        &mut self,
        caller: Address,
        class_id: ClassId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Holder)?;
        self.burn_holder(caller, class_id, amount)
    }

    /// Self-service batch burn, validated in full before any mutation.
    pub fn batch_burn(
        &mut self,
        caller: Address,
        class_ids: &[ClassId],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Holder)?;
        self.batch_burn_holder(caller, class_ids, amounts)
    }

    /// Administrator force-burn from any holder's balance.
    pub fn burn_from(
        &mut self,
        caller: Address,
        holder: Address,
        class_id: ClassId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        self.burn_holder(holder, class_id, amount)
    }

    /// Administrator batch force-burn; same atomicity contract as
    /// [`TokenLedger::batch_burn`].
    pub fn batch_burn_from(
        &mut self,
        caller: Address,
        holder: Address,
        class_ids: &[ClassId],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        self.batch_burn_holder(holder, class_ids, amounts)
    }

    fn burn_holder(
        &mut self,
        holder: Address,
        class_id: ClassId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.state.balances.debit(&holder, class_id, amount)?;
        self.emit(LedgerEvent::Burned {
            holder,
            class_id,
            amount,
        });
        Ok(())
    }

    fn batch_burn_holder(
        &mut self,
        holder: Address,
        class_ids: &[ClassId],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        check_lengths(class_ids.len(), amounts.len())?;

        let mut staged = self.state.balances.clone();
        for i in 0..class_ids.len() {
            staged.debit(&holder, class_ids[i], amounts[i])?;
        }
        self.state.balances = staged;

        self.emit(LedgerEvent::BatchBurned {
            holder,
            class_ids: class_ids.to_vec(),
            amounts: amounts.to_vec(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transfer
    // ------------------------------------------------------------------

    /// Move `amount` of one class from `from` to `to`. The transfer gate is
    /// checked before anything else; the administrator bypasses it and is
    /// the only caller allowed to move a third party's funds.
    pub fn transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        class_id: ClassId,
        amount: Amount,
        aux: &[u8],
    ) -> Result<(), LedgerError> {
        self.check_transfer_gate(&caller)?;
        self.check_operator(&caller, &from)?;

        let mut staged = self.state.balances.clone();
        staged.debit(&from, class_id, amount)?;
        staged.credit(to, class_id, amount)?;
        self.state.balances = staged;

        self.emit(LedgerEvent::Transferred {
            operator: caller,
            from,
            to,
            class_id,
            amount,
            aux: aux.to_vec(),
        });
        Ok(())
    }

    /// Batch form of [`TokenLedger::transfer`], all-or-nothing.
    pub fn batch_transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        class_ids: &[ClassId],
        amounts: &[Amount],
        aux: &[u8],
    ) -> Result<(), LedgerError> {
        self.check_transfer_gate(&caller)?;
        self.check_operator(&caller, &from)?;
        check_lengths(class_ids.len(), amounts.len())?;

        let mut staged = self.state.balances.clone();
        for i in 0..class_ids.len() {
            staged.debit(&from, class_ids[i], amounts[i])?;
            staged.credit(to, class_ids[i], amounts[i])?;
        }
        self.state.balances = staged;

        self.emit(LedgerEvent::BatchTransferred {
            operator: caller,
            from,
            to,
            class_ids: class_ids.to_vec(),
            amounts: amounts.to_vec(),
            aux: aux.to_vec(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Gates, name, administration
    // ------------------------------------------------------------------

    pub fn set_transfers_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        self.state.transfers_enabled = enabled;
        self.emit(LedgerEvent::TransfersGateChanged { enabled });
        Ok(())
    }

    /// Publishable gate for an external marketplace collaborator. The ledger
    /// records and announces the flag but performs no marketplace logic.
    pub fn set_market_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        self.state.market_enabled = enabled;
        self.emit(LedgerEvent::MarketGateChanged { enabled });
        Ok(())
    }

    /// Replace the display name. Purely informational; accounting ignores it.
    pub fn set_name(&mut self, caller: Address, new_name: &str) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        if new_name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let old = std::mem::replace(&mut self.state.name, new_name.to_string());
        self.emit(LedgerEvent::NameChanged {
            old,
            new: new_name.to_string(),
        });
        Ok(())
    }

    /// Hand the administrator role to another principal.
    pub fn set_administrator(
        &mut self,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), LedgerError> {
        authorize(&self.state.administrator, &caller, Role::Administrator)?;
        let old = std::mem::replace(&mut self.state.administrator, new_admin);
        self.emit(LedgerEvent::AdministratorChanged {
            old,
            new: new_admin,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internal checks
    // ------------------------------------------------------------------

    fn check_transfer_gate(&self, caller: &Address) -> Result<(), LedgerError> {
        if self.state.transfers_enabled || caller == &self.state.administrator {
            Ok(())
        } else {
            Err(LedgerError::TransfersDisabled)
        }
    }

    /// Only the owner of the source balance or the administrator may move it.
    fn check_operator(&self, caller: &Address, from: &Address) -> Result<(), LedgerError> {
        if caller == from {
            Ok(())
        } else {
            authorize(&self.state.administrator, caller, Role::Administrator)
        }
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.sink.emit(event);
    }
}

fn check_lengths(left: usize, right: usize) -> Result<(), LedgerError> {
    if left != right {
        return Err(LedgerError::ArrayLengthMismatch { left, right });
    }
    Ok(())
}
