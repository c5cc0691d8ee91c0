use crate::error::LedgerError;
use crate::identity::Address;
use std::collections::BTreeMap;

/// Token class identifiers are assigned sequentially from 0 in creation order.
pub type ClassId = u64;

/// Balance amounts. All arithmetic on balances is checked.
pub type Amount = u128;

/// One registered asset type. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenClass {
    pub id: ClassId,
    pub uri_suffix: String,
}

/// Sparse per-holder balance accounting for every token class.
///
/// A missing entry reads as 0 and a balance that returns to 0 is pruned,
/// so the two situations are indistinguishable. BTreeMap keeps iteration
/// and serialization order deterministic, which the state digest relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BalanceTable {
    balances: BTreeMap<ClassId, BTreeMap<Address, Amount>>,
}

impl BalanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder` for `class_id`; 0 for any pair never credited.
    pub fn get(&self, holder: &Address, class_id: ClassId) -> Amount {
        self.balances
            .get(&class_id)
            .and_then(|class_balances| class_balances.get(holder))
            .copied()
            .unwrap_or(0)
    }

    /// Increase a balance, failing on overflow without touching the table.
    pub fn credit(
        &mut self,
        holder: Address,
        class_id: ClassId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let current = self.get(&holder, class_id);
        let updated = current
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        if updated == 0 {
            // Crediting 0 to an empty slot must not materialize an entry.
            return Ok(());
        }
        self.balances
            .entry(class_id)
            .or_default()
            .insert(holder, updated);
        Ok(())
    }

    /// Decrease a balance, failing when the holder does not cover `amount`.
    pub fn debit(
        &mut self,
        holder: &Address,
        class_id: ClassId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.get(holder, class_id);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                class_id,
                requested: amount,
                available,
            });
        }
        let remaining = available - amount;
        if remaining == 0 {
            if let Some(class_balances) = self.balances.get_mut(&class_id) {
                class_balances.remove(holder);
                if class_balances.is_empty() {
                    self.balances.remove(&class_id);
                }
            }
        } else {
            self.balances
                .entry(class_id)
                .or_default()
                .insert(*holder, remaining);
        }
        Ok(())
    }

    /// Total amount of one class across all holders.
    pub fn class_supply(&self, class_id: ClassId) -> Amount {
        self.balances
            .get(&class_id)
            .map(|class_balances| {
                class_balances
                    .values()
                    .fold(0u128, |acc, amount| acc.saturating_add(*amount))
            })
            .unwrap_or(0)
    }

    /// Number of holders with a non-zero balance of `class_id`.
    pub fn holder_count(&self, class_id: ClassId) -> usize {
        self.balances
            .get(&class_id)
            .map(|class_balances| class_balances.len())
            .unwrap_or(0)
    }
}

/// The complete persistable state of the ledger: administrator identity,
/// display name, base metadata locator, the ordered class registry, the
/// sparse balance table, and the two global gate flags.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LedgerState {
    pub administrator: Address,
    pub name: String,
    pub base_uri: String,
    pub classes: Vec<TokenClass>,
    pub balances: BalanceTable,
    pub transfers_enabled: bool,
    pub market_enabled: bool,
}

impl LedgerState {
    pub fn new(administrator: Address, name: &str, base_uri: &str) -> Self {
        LedgerState {
            administrator,
            name: name.to_string(),
            base_uri: base_uri.to_string(),
            classes: Vec::new(),
            balances: BalanceTable::new(),
            transfers_enabled: false,
            market_enabled: false,
        }
    }

    /// A class exists iff its id is below the number of classes ever created.
    pub fn class_exists(&self, class_id: ClassId) -> bool {
        (class_id as usize) < self.classes.len()
    }
}
