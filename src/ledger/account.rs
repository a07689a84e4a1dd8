use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::directory::AccountDirectory;
use super::error::AccountError;
use super::transaction::{has_valid_scale, Transaction, TransactionKind};
use super::Decimal;

pub type AccountId = u32;

/// Charged on every Checking withdrawal after the first one in a calendar month.
pub const WITHDRAWAL_FEE: Decimal = Decimal::from_parts(477, 0, 0, false, 2);

const WITHDRAWAL_DESCRIPTION: &str = "Terminal withdrawal";
const FEE_DESCRIPTION: &str = "Withdrawal fee";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    fn charges_withdrawal_fee(self) -> bool {
        match self {
            AccountType::Checking => true,
            AccountType::Savings => false,
        }
    }

    /// Lowest balance a withdrawal may leave for the given overdraft limit.
    fn floor(self, overdraft_limit: Decimal) -> Result<Decimal, AccountError> {
        match self {
            AccountType::Checking if overdraft_limit.is_zero() => Ok(Decimal::ZERO),
            AccountType::Checking if overdraft_limit > Decimal::ZERO => Ok(-overdraft_limit),
            AccountType::Savings if overdraft_limit.is_zero() => Ok(Decimal::ZERO),
            AccountType::Checking | AccountType::Savings => {
                Err(AccountError::InvalidConfiguration {
                    account_type: self,
                    overdraft_limit,
                })
            }
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Checking => write!(f, "checking"),
            AccountType::Savings => write!(f, "savings"),
        }
    }
}

/// Validated debit waiting to be appended: the withdrawal and its fee, if any.
#[derive(Debug)]
struct Debit {
    withdrawal: Transaction,
    fee: Option<Transaction>,
}

/// A bank account whose balance is always derived from its transaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    account_type: AccountType,
    /// Negated overdraft limit
    floor: Decimal,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Open an empty account.
    pub fn new(account_type: AccountType, overdraft_limit: Decimal) -> Result<Self, AccountError> {
        Self::from_history(account_type, overdraft_limit, Vec::new())
    }

    pub fn checking(overdraft_limit: Decimal) -> Result<Self, AccountError> {
        Self::new(AccountType::Checking, overdraft_limit)
    }

    pub fn savings() -> Result<Self, AccountError> {
        Self::new(AccountType::Savings, Decimal::ZERO)
    }

    /// Restore an account from previously recorded transactions.
    ///
    /// Fails if the configuration is invalid for the account type, if the
    /// history cannot be summed without overflow, or if the restored balance
    /// is already below the account floor.
    pub fn from_history(
        account_type: AccountType,
        overdraft_limit: Decimal,
        history: impl IntoIterator<Item = Transaction>,
    ) -> Result<Self, AccountError> {
        let floor = account_type.floor(overdraft_limit)?;
        let transactions: Vec<Transaction> = history.into_iter().collect();

        let balance = transactions
            .iter()
            .try_fold(Decimal::ZERO, |balance, tx| {
                balance
                    .checked_add(tx.amount())
                    .ok_or(AccountError::AmountOverflow {
                        balance,
                        amount: tx.amount(),
                    })
            })?
            .normalize();
        let account = Self {
            account_type,
            floor,
            transactions,
        };

        if balance < floor {
            return Err(AccountError::InvariantViolation { balance, floor });
        }

        log::debug!(
            "Opened {account_type} account with {} transactions, balance={balance}",
            account.transactions.len()
        );
        Ok(account)
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Returns how far the balance may go below zero (never negative)
    pub fn overdraft_limit(&self) -> Decimal {
        if self.floor.is_zero() {
            Decimal::ZERO
        } else {
            -self.floor
        }
    }

    /// Returns the lowest balance a withdrawal may leave
    pub fn floor(&self) -> Decimal {
        self.floor
    }

    /// Returns the balance, summed from the transaction history on every call.
    ///
    /// Every append is checked against the running total first, so the sum
    /// cannot overflow.
    pub fn balance(&self) -> Decimal {
        self.transactions
            .iter()
            .map(Transaction::amount)
            .sum::<Decimal>()
            .normalize()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.transactions.last()
    }

    /// Number of withdrawals recorded in the given calendar month
    pub fn withdrawals_in_month(&self, year: i32, month: u32) -> usize {
        self.withdrawals()
            .filter(|tx| tx.is_in_month(year, month))
            .count()
    }

    pub fn deposit(&mut self, depositor: &str, amount: Decimal) -> Result<(), AccountError> {
        self.deposit_at(depositor, amount, Utc::now())
    }

    /// Credit the account on behalf of `depositor`. Deposits never incur fees.
    pub fn deposit_at(
        &mut self,
        depositor: &str,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        ensure_valid_amount(amount)?;
        let depositor = depositor.trim();
        if depositor.is_empty() {
            return Err(AccountError::MissingParty);
        }

        self.credit_at(amount, &format!("Deposit by {depositor}"), at)
    }

    /// Record an inflow with a caller-provided description (e.g. the credit leg of a transfer).
    pub fn credit_at(
        &mut self,
        amount: Decimal,
        description: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        ensure_valid_amount(amount)?;
        let balance = self.balance();
        let new_balance = balance
            .checked_add(amount)
            .ok_or(AccountError::AmountOverflow { balance, amount })?;
        self.transactions.push(Transaction::recorded(
            at,
            TransactionKind::Deposit,
            amount,
            description,
        ));

        log::trace!("[deposit] amount={amount} \"{description}\" -> balance={new_balance}");
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        self.withdraw_at(amount, Utc::now())
    }

    /// Debit the account. Checking accounts pay `WITHDRAWAL_FEE` on every
    /// withdrawal after the first one in the calendar month of `at`.
    pub fn withdraw_at(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), AccountError> {
        let debit = self.plan_debit(amount, at, WITHDRAWAL_DESCRIPTION.to_string())?;
        self.commit(debit);
        Ok(())
    }

    pub fn transfer<D: AccountDirectory>(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        directory: &mut D,
    ) -> Result<(), AccountError> {
        self.transfer_at(from, to, amount, directory, Utc::now())
    }

    /// Move `amount` from this account (known to the directory as `from`) to `to`.
    ///
    /// The debit follows the same rules as [`Account::withdraw_at`]. It is only
    /// recorded once the directory has accepted the credit on the counterparty.
    pub fn transfer_at<D: AccountDirectory>(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        directory: &mut D,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        ensure_valid_amount(amount)?;
        if from == to {
            return Err(AccountError::SelfTransfer { account: from });
        }
        if directory.resolve(to).is_none() {
            return Err(AccountError::AccountNotFound { account: to });
        }

        let debit = self.plan_debit(amount, at, format!("Transfer to account {to}"))?;
        directory.credit(to, amount, &format!("Transfer from account {from}"), at)?;
        self.commit(debit);

        log::trace!("[transfer] from={from} to={to} amount={amount}");
        Ok(())
    }

    fn withdrawals(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.kind() == TransactionKind::Withdrawal)
    }

    /// Check funds and work out the fee without touching the history.
    fn plan_debit(
        &self,
        amount: Decimal,
        at: DateTime<Utc>,
        description: String,
    ) -> Result<Debit, AccountError> {
        ensure_valid_amount(amount)?;

        let balance = self.balance();
        let remaining = match balance.checked_sub(amount) {
            Some(remaining) if remaining >= self.floor => remaining,
            _ => {
                return Err(AccountError::InsufficientFunds {
                    balance,
                    requested: amount,
                    overdraft_limit: self.overdraft_limit(),
                })
            }
        };

        let withdrew_this_month = self
            .withdrawals()
            .any(|tx| tx.is_in_month(at.year(), at.month()));
        let fee = if self.account_type.charges_withdrawal_fee() && withdrew_this_month {
            // Only reachable with an overdraft limit close to Decimal::MAX.
            remaining
                .checked_sub(WITHDRAWAL_FEE)
                .ok_or(AccountError::AmountOverflow {
                    balance: remaining,
                    amount: -WITHDRAWAL_FEE,
                })?;
            Some(Transaction::recorded(
                at,
                TransactionKind::Fee,
                WITHDRAWAL_FEE,
                FEE_DESCRIPTION,
            ))
        } else {
            None
        };

        Ok(Debit {
            withdrawal: Transaction::recorded(
                at,
                TransactionKind::Withdrawal,
                amount,
                description,
            ),
            fee,
        })
    }

    // The fee is not checked against the floor.
    fn commit(&mut self, debit: Debit) {
        let requested = -debit.withdrawal.amount();
        self.transactions.push(debit.withdrawal);
        let charged_fee = debit.fee.is_some();
        if let Some(fee) = debit.fee {
            self.transactions.push(fee);
        }

        let balance = self.balance();
        log::trace!("[withdrawal] amount={requested} fee={charged_fee} -> balance={balance}");
        if balance < self.floor {
            log::warn!(
                "Withdrawal fee took the balance to {balance}, below the floor {}",
                self.floor
            );
        }
    }
}

/// Amounts must be positive and fit in whole cents.
fn ensure_valid_amount(amount: Decimal) -> Result<(), AccountError> {
    if amount > Decimal::ZERO && has_valid_scale(amount) {
        Ok(())
    } else {
        Err(AccountError::InvalidAmount { amount })
    }
}
