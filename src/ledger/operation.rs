mod deposit;
mod transfer;
mod withdraw;

pub use deposit::Deposit;
pub use transfer::Transfer;
pub use withdraw::Withdraw;

use super::account::AccountId;
use super::Decimal;
use crate::ledger::error::TransactionError;
use serde::Deserialize;

/// Raw operation record as parsed from CSV input.
/// This is the unvalidated form that needs conversion to a specific `Operation`.
#[derive(Debug, Deserialize, Clone)]
pub struct OperationRecord {
    pub op: OperationType,
    pub account: AccountId,
    /// Destination account, only for transfers
    pub to: Option<AccountId>,
    pub amount: Option<Decimal>,
    /// Depositor name, only for deposits
    pub party: Option<String>,
}

impl std::fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (account: {}", self.op, self.account)?;
        if let Some(to) = self.to {
            write!(f, ", to: {to}")?;
        }
        if let Some(amount) = self.amount {
            write!(f, ", amount: {amount}")?;
        }
        if let Some(party) = &self.party {
            write!(f, ", party: {party:?}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdraw,
    Transfer,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Deposit => write!(f, "deposit"),
            OperationType::Withdraw => write!(f, "withdraw"),
            OperationType::Transfer => write!(f, "transfer"),
        }
    }
}

/// A structurally valid operation ready to be applied by the bank.
///
/// Amount and party rules are left to the account so that they are enforced in one place.
#[derive(Debug, Clone)]
pub enum Operation {
    Deposit(Deposit),
    Withdraw(Withdraw),
    Transfer(Transfer),
}

impl TryFrom<OperationRecord> for Operation {
    type Error = TransactionError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        match record.op {
            OperationType::Deposit => Ok(Operation::Deposit(Deposit::try_from(record)?)),
            OperationType::Withdraw => Ok(Operation::Withdraw(Withdraw::try_from(record)?)),
            OperationType::Transfer => Ok(Operation::Transfer(Transfer::try_from(record)?)),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Deposit(d) => write!(
                f,
                "[deposit] account={} amount={} party={:?}",
                d.account_id(),
                d.amount(),
                d.depositor()
            ),
            Operation::Withdraw(w) => {
                write!(f, "[withdraw] account={} amount={}", w.account_id(), w.amount())
            }
            Operation::Transfer(t) => write!(
                f,
                "[transfer] from={} to={} amount={}",
                t.from_account_id(),
                t.to_account_id(),
                t.amount()
            ),
        }
    }
}
