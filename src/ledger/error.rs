use crate::ledger::account::{AccountId, AccountType};
use crate::ledger::operation::OperationRecord;
use crate::ledger::transaction::TransactionKind;
use crate::ledger::Decimal;

/// Top-level error type for the bank driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
    #[error("Account {account} could not be opened: {source}")]
    Account {
        account: AccountId,
        #[source]
        source: AccountError,
    },
    #[error("History references unknown account {account}")]
    UnknownAccount { account: AccountId },
    #[error("Account {account} is configured more than once")]
    DuplicateAccount { account: AccountId },
}

/// Errors while turning raw input into `Transaction`s or `Operation`s (hard errors).
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("{kind} amount {amount} has the wrong sign")]
    SignMismatch {
        kind: TransactionKind,
        amount: Decimal,
    },
    #[error("Amount {amount} has more than 2 decimal places")]
    TooPrecise { amount: Decimal },
    #[error("Invalid operation: {0}")]
    InvalidOperation(OperationRecord),
}

/// Errors raised by account operations.
/// Nothing is recorded when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountError {
    #[error("Amount must be positive with at most 2 decimal places, got {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Amount {amount} would overflow balance {balance}")]
    AmountOverflow { balance: Decimal, amount: Decimal },

    #[error("Depositor must be provided")]
    MissingParty,

    #[error(
        "Insufficient funds: balance {balance}, requested {requested}, overdraft limit {overdraft_limit}"
    )]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
        overdraft_limit: Decimal,
    },

    #[error("Overdraft limit {overdraft_limit} is not allowed for a {account_type} account")]
    InvalidConfiguration {
        account_type: AccountType,
        overdraft_limit: Decimal,
    },

    #[error("Balance {balance} is below the account floor {floor}")]
    InvariantViolation { balance: Decimal, floor: Decimal },

    #[error("Account {account} not found")]
    AccountNotFound { account: AccountId },

    #[error("Account {account} cannot transfer to itself")]
    SelfTransfer { account: AccountId },
}
