use bank_ledger::AccountId;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bank-ledger",
    author,
    version,
    about = "Replay deposits, withdrawals and transfers against a set of bank accounts",
    long_about = None,
    after_help = "OUTPUT:\n    Balances (or a statement with --statement) are printed to stdout in CSV format.\n    Use shell redirection to save to a file:\n\n    bank-ledger --accounts accounts.csv operations.csv > balances.csv"
)]
pub struct Args {
    /// Path to the operations CSV file
    #[arg(
        index = 1,
        value_name = "FILE",
        help = "Operations CSV file with columns: op, account, to, amount, party"
    )]
    pub operations_file: PathBuf,

    /// Path to the account configuration CSV file
    #[arg(
        long,
        value_name = "FILE",
        help = "Accounts CSV file with columns: account, type, overdraft_limit"
    )]
    pub accounts: PathBuf,

    /// Optional seed history
    #[arg(
        long,
        value_name = "FILE",
        help = "History CSV file with columns: account, timestamp, kind, amount, description"
    )]
    pub history: Option<PathBuf>,

    /// Print this account's transactions instead of the balances
    #[arg(long, value_name = "ACCOUNT")]
    pub statement: Option<AccountId>,
}
