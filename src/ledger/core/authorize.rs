/// Authorization checks separated from ledger state transitions.
///
/// Kept as a free function over (administrator, caller, role) so that an
/// alternate scheme (multi-admin, role lists) can replace it without
/// touching the ledger operations themselves.
use crate::error::LedgerError;
use crate::identity::Address;

/// Roles recognized by the ledger access-control model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The single privileged identity fixed at construction time.
    Administrator,
    /// Any authenticated caller acting on its own balances.
    Holder,
}

/// Check that `caller` may act in `role` on a ledger run by `administrator`.
pub fn authorize(
    administrator: &Address,
    caller: &Address,
    role: Role,
) -> Result<(), LedgerError> {
    match role {
        Role::Administrator => {
            if caller == administrator {
                Ok(())
            } else {
                Err(LedgerError::NotAdministrator)
            }
        }
        Role::Holder => Ok(()),
    }
}
