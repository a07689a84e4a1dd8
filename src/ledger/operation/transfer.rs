use crate::ledger::{
    account::AccountId,
    error::TransactionError,
    operation::{OperationRecord, OperationType},
    transaction::has_valid_scale,
    Decimal,
};

/// A transfer between two accounts held by the same bank.
#[derive(Debug, Clone)]
pub struct Transfer {
    from_account_id: AccountId,
    to_account_id: AccountId,
    amount: Decimal,
}

impl Transfer {
    pub fn from_account_id(&self) -> AccountId {
        self.from_account_id
    }

    pub fn to_account_id(&self) -> AccountId {
        self.to_account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl TryFrom<OperationRecord> for Transfer {
    type Error = TransactionError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        match record {
            OperationRecord {
                op: OperationType::Transfer,
                account,
                to: Some(to),
                amount: Some(amount),
                party: None,
            } if has_valid_scale(amount) => Ok(Transfer {
                from_account_id: account,
                to_account_id: to,
                amount,
            }),
            _ => Err(TransactionError::InvalidOperation(record)),
        }
    }
}
