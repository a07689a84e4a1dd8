use crate::ledger::{
    account::AccountId,
    error::TransactionError,
    operation::{OperationRecord, OperationType},
    transaction::has_valid_scale,
    Decimal,
};

/// A withdrawal at a terminal.
///
/// Subject to the account's overdraft floor and, for checking accounts, the monthly fee.
#[derive(Debug, Clone)]
pub struct Withdraw {
    account_id: AccountId,
    amount: Decimal,
}

impl Withdraw {
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl TryFrom<OperationRecord> for Withdraw {
    type Error = TransactionError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        match record {
            OperationRecord {
                op: OperationType::Withdraw,
                account,
                to: None,
                amount: Some(amount),
                party: None,
            } if has_valid_scale(amount) => Ok(Withdraw {
                account_id: account,
                amount,
            }),
            _ => Err(TransactionError::InvalidOperation(record)),
        }
    }
}
