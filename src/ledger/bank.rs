use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountId, AccountType};
use super::directory::AccountDirectory;
use super::error::{AccountError, Error};
use super::operation::{Deposit, Operation, OperationRecord, Transfer, Withdraw};
use super::transaction::{serialize_decimal_2dp, HistoryRecord, Transaction};
use super::Decimal;

/// Account configuration row: `account,type,overdraft_limit`.
#[derive(Debug, Deserialize)]
struct AccountRecord {
    account: AccountId,
    #[serde(rename = "type")]
    account_type: AccountType,
    overdraft_limit: Option<Decimal>,
}

/// Balance row written by [`Bank::export_balances`].
#[derive(Debug, Serialize)]
struct BalanceRecord {
    account: AccountId,
    #[serde(rename = "type")]
    account_type: AccountType,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    overdraft_limit: Decimal,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    balance: Decimal,
}

/// In-memory account directory.
///
/// Owns every account, replays operations against them and acts as the
/// counterparty directory for transfers.
#[derive(Debug, Default)]
pub struct Bank {
    /// Ordered by id so exports are stable
    accounts: BTreeMap<AccountId, Account>,
}

impl Bank {
    /// Create a bank with no accounts
    pub fn new() -> Self {
        log::trace!("Bank initialized");
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Open accounts from a configuration CSV with no prior history.
    pub fn load_accounts<R: Read>(accounts: R) -> Result<Self, Error> {
        Self::load(accounts, std::io::empty())
    }

    /// Open accounts from a configuration CSV, seeding each one with its rows
    /// from the history CSV. Every account is validated as it is restored.
    pub fn load<A: Read, H: Read>(accounts: A, history: H) -> Result<Self, Error> {
        let mut histories = read_history(history)?;
        let mut bank = Self::new();

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(accounts);

        for result in csv_reader.deserialize() {
            let record: AccountRecord = result?;
            let seed = histories.remove(&record.account).unwrap_or_default();
            let account = Account::from_history(
                record.account_type,
                record.overdraft_limit.unwrap_or(Decimal::ZERO),
                seed,
            )
            .map_err(|source| Error::Account {
                account: record.account,
                source,
            })?;
            bank.open_account(record.account, account)?;
        }

        if let Some(account) = histories.keys().min() {
            return Err(Error::UnknownAccount { account: *account });
        }

        log::info!("Loaded {} accounts", bank.accounts.len());
        Ok(bank)
    }

    /// Register an already constructed account under `id`.
    pub fn open_account(&mut self, id: AccountId, account: Account) -> Result<(), Error> {
        if self.accounts.contains_key(&id) {
            return Err(Error::DuplicateAccount { account: id });
        }
        log::debug!(
            "Opened account {id} ({}, balance {})",
            account.account_type(),
            account.balance()
        );
        self.accounts.insert(id, account);
        Ok(())
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Returns the number of accounts in the bank
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Primary API: replay operations from any source (File, `TcpStream`, etc.)
    ///
    /// Malformed rows abort processing. Operations rejected by an account are
    /// logged and skipped.
    pub fn process_operations<R: Read>(&mut self, reader: R) -> Result<(), Error> {
        log::info!("Starting operation processing");

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut processed = 0u64;
        let mut skipped = 0u64;

        for result in csv_reader.deserialize() {
            let record: OperationRecord = result?;

            let row_num = processed + skipped + 1;
            log::trace!("[row {row_num}] Parsing: {record}");

            let operation = Operation::try_from(record)?;

            if let Err(e) = self.apply(operation) {
                log::warn!("[row {row_num}] - Skipped: {e}");
                skipped += 1;
            } else {
                processed += 1;
            }
        }

        log::info!(
            "Processing complete: {} processed, {} skipped, {} accounts",
            processed,
            skipped,
            self.accounts.len()
        );
        Ok(())
    }

    /// Apply a single operation, stamped with the current time.
    pub fn apply(&mut self, operation: Operation) -> Result<(), AccountError> {
        self.apply_at(operation, Utc::now())
    }

    /// Apply a single operation, stamped with `at`.
    pub fn apply_at(&mut self, operation: Operation, at: DateTime<Utc>) -> Result<(), AccountError> {
        log::trace!("Applying operation: {operation}");
        match operation {
            Operation::Deposit(deposit) => self.handle_deposit(deposit, at),
            Operation::Withdraw(withdraw) => self.handle_withdraw(withdraw, at),
            Operation::Transfer(transfer) => self.handle_transfer(transfer, at),
        }
    }

    /// Secondary API: write `account,type,overdraft_limit,balance` rows to any sink.
    pub fn export_balances<W: Write>(&self, writer: W) -> Result<(), Error> {
        log::info!("Exporting {} accounts", self.accounts.len());

        let mut csv_writer = csv::Writer::from_writer(writer);
        for (id, account) in &self.accounts {
            csv_writer.serialize(BalanceRecord {
                account: *id,
                account_type: account.account_type(),
                overdraft_limit: account.overdraft_limit(),
                balance: account.balance(),
            })?;
        }
        csv_writer.flush()?;

        log::trace!("Export complete");
        Ok(())
    }

    /// Write the transaction history of one account, oldest first.
    pub fn export_statement<W: Write>(&self, id: AccountId, writer: W) -> Result<(), Error> {
        let account = self
            .accounts
            .get(&id)
            .ok_or(Error::UnknownAccount { account: id })?;
        log::info!(
            "Exporting {} transactions for account {id}",
            account.transactions().len()
        );

        let mut csv_writer = csv::Writer::from_writer(writer);
        for transaction in account.transactions() {
            csv_writer.serialize(transaction)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, AccountError> {
        self.accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound { account: id })
    }
}

impl AccountDirectory for Bank {
    fn resolve(&self, account: AccountId) -> Option<&Account> {
        self.accounts.get(&account)
    }

    fn credit(
        &mut self,
        account: AccountId,
        amount: Decimal,
        description: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        self.account_mut(account)?.credit_at(amount, description, at)
    }
}

fn read_history<R: Read>(reader: R) -> Result<HashMap<AccountId, Vec<Transaction>>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut histories: HashMap<AccountId, Vec<Transaction>> = HashMap::new();
    for result in csv_reader.deserialize() {
        let record: HistoryRecord = result?;
        let account = record.account;
        let transaction = Transaction::try_from(record)?;
        histories.entry(account).or_default().push(transaction);
    }
    Ok(histories)
}

// =============================================================================
// Operation Handlers
// =============================================================================

impl Bank {
    fn handle_deposit(&mut self, deposit: Deposit, at: DateTime<Utc>) -> Result<(), AccountError> {
        let id = deposit.account_id();
        let account = self.account_mut(id)?;
        account.deposit_at(deposit.depositor(), deposit.amount(), at)?;

        log::trace!(
            "[deposit] account={id} amount={} -> new_balance={}",
            deposit.amount(),
            account.balance()
        );
        Ok(())
    }

    fn handle_withdraw(&mut self, withdraw: Withdraw, at: DateTime<Utc>) -> Result<(), AccountError> {
        let id = withdraw.account_id();
        let account = self.account_mut(id)?;
        account.withdraw_at(withdraw.amount(), at)?;

        log::trace!(
            "[withdraw] account={id} amount={} -> new_balance={}",
            withdraw.amount(),
            account.balance()
        );
        Ok(())
    }

    fn handle_transfer(&mut self, transfer: Transfer, at: DateTime<Utc>) -> Result<(), AccountError> {
        let from = transfer.from_account_id();
        let to = transfer.to_account_id();

        // The source leaves the map while it is debited so the bank can lend
        // itself out as the directory for the credit leg.
        let mut source = self
            .accounts
            .remove(&from)
            .ok_or(AccountError::AccountNotFound { account: from })?;
        let result = source.transfer_at(from, to, transfer.amount(), self, at);
        self.accounts.insert(from, source);
        result?;

        log::trace!(
            "[transfer] from={from} to={to} amount={}",
            transfer.amount()
        );
        Ok(())
    }
}
