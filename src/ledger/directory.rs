use chrono::{DateTime, Utc};

use super::account::{Account, AccountId};
use super::error::AccountError;
use super::Decimal;

/// Looks up counterparties and credits them on behalf of a transfer.
///
/// Implementors own the accounts they hand out and are responsible for
/// serializing access to them.
pub trait AccountDirectory {
    fn resolve(&self, account: AccountId) -> Option<&Account>;

    fn credit(
        &mut self,
        account: AccountId,
        amount: Decimal,
        description: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError>;
}
