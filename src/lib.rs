//! A bank account ledger.
//!
//! Accounts keep an ordered, append-only transaction history and derive their
//! balance from it. Checking accounts may be overdrawn up to a configured limit
//! and pay a fee on every withdrawal after the first one in a calendar month.
//! Savings accounts can never go negative and are never charged.

mod ledger;

pub use ledger::*;
pub use rust_decimal::Decimal;
