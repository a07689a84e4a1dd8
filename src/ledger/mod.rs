//! Bank ledger module.
//!
//! This module contains the account ledger and its supporting pieces:
//! - `Account` - Transaction history, derived balance and checking/savings policy
//! - `Transaction` - Immutable ledger entries (deposit, withdrawal, fee)
//! - `AccountDirectory` - Counterparty lookup used by transfers
//! - `Bank` - In-memory directory that loads, replays and exports accounts
//! - `Operation` types - Deposit, Withdraw, Transfer commands parsed from CSV
//! - `Error` types - Account, conversion and I/O errors

mod account;
mod bank;
mod directory;
mod error;
mod operation;
mod transaction;

pub(crate) use rust_decimal::Decimal;

pub use account::{Account, AccountId, AccountType, WITHDRAWAL_FEE};
pub use bank::Bank;
pub use directory::AccountDirectory;
pub use error::{AccountError, Error, TransactionError};
pub use operation::{Deposit, Operation, OperationRecord, OperationType, Transfer, Withdraw};
pub use transaction::{HistoryRecord, Transaction, TransactionKind, AMOUNT_SCALE};
