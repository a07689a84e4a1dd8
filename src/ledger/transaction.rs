use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::account::AccountId;
use super::error::TransactionError;
use super::Decimal;

/// Most decimal places an amount may carry. Amounts are exported at this precision.
pub const AMOUNT_SCALE: u32 = 2;

/// Returns true if `amount` fits in `AMOUNT_SCALE` decimal places, ignoring trailing zeros.
pub(super) fn has_valid_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_SCALE
}

/// Serialize Decimal with exactly 2 decimal places
pub(super) fn serialize_decimal_2dp<S: Serializer>(
    value: &Decimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Fee,
}

impl TransactionKind {
    /// Whether amounts of this kind flow into the account.
    pub fn is_inflow(self) -> bool {
        match self {
            TransactionKind::Deposit => true,
            TransactionKind::Withdrawal | TransactionKind::Fee => false,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
            TransactionKind::Fee => write!(f, "fee"),
        }
    }
}

/// An immutable ledger entry.
///
/// Amounts are signed: deposits are positive, withdrawals and fees negative.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Transaction {
    timestamp: DateTime<Utc>,
    kind: TransactionKind,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    amount: Decimal,
    description: String,
}

impl Transaction {
    /// Build an entry from stored history, checking that the sign matches the kind.
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Self, TransactionError> {
        let sign_ok = if kind.is_inflow() {
            amount > Decimal::ZERO
        } else {
            amount < Decimal::ZERO
        };
        if !sign_ok {
            return Err(TransactionError::SignMismatch { kind, amount });
        }
        if !has_valid_scale(amount) {
            return Err(TransactionError::TooPrecise { amount });
        }
        Ok(Self {
            timestamp,
            kind,
            amount: amount.normalize(),
            description: description.into(),
        })
    }

    /// Callers pass positive magnitudes; outflows are negated here.
    pub(super) fn recorded(
        timestamp: DateTime<Utc>,
        kind: TransactionKind,
        magnitude: Decimal,
        description: impl Into<String>,
    ) -> Self {
        debug_assert!(magnitude > Decimal::ZERO, "magnitude must be positive");
        let amount = if kind.is_inflow() {
            magnitude
        } else {
            -magnitude
        };
        Self {
            timestamp,
            kind,
            amount: amount.normalize(),
            description: description.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if this entry was recorded in the given calendar month.
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.timestamp.year() == year && self.timestamp.month() == month
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} amount={} \"{}\"",
            self.kind,
            self.timestamp.to_rfc3339(),
            self.amount,
            self.description
        )
    }
}

/// Raw seed history row as parsed from CSV input.
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryRecord {
    pub account: AccountId,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<HistoryRecord> for Transaction {
    type Error = TransactionError;

    fn try_from(record: HistoryRecord) -> Result<Self, Self::Error> {
        Transaction::new(
            record.timestamp,
            record.kind,
            record.amount,
            record.description,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_accepts_matching_signs() {
        assert!(Transaction::new(at(2024, 1, 1), TransactionKind::Deposit, dec!(10), "d").is_ok());
        assert!(
            Transaction::new(at(2024, 1, 1), TransactionKind::Withdrawal, dec!(-10), "w").is_ok()
        );
        assert!(Transaction::new(at(2024, 1, 1), TransactionKind::Fee, dec!(-4.77), "f").is_ok());
    }

    #[test]
    fn test_new_rejects_negative_deposit() {
        let err = Transaction::new(at(2024, 1, 1), TransactionKind::Deposit, dec!(-10), "d")
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::SignMismatch {
                kind: TransactionKind::Deposit,
                ..
            }
        ));
    }

    #[test]
    fn test_new_rejects_positive_outflows() {
        assert!(
            Transaction::new(at(2024, 1, 1), TransactionKind::Withdrawal, dec!(10), "w").is_err()
        );
        assert!(Transaction::new(at(2024, 1, 1), TransactionKind::Fee, dec!(4.77), "f").is_err());
    }

    #[test]
    fn test_new_rejects_zero_amount() {
        assert!(
            Transaction::new(at(2024, 1, 1), TransactionKind::Deposit, Decimal::ZERO, "d").is_err()
        );
        assert!(
            Transaction::new(at(2024, 1, 1), TransactionKind::Withdrawal, Decimal::ZERO, "w")
                .is_err()
        );
    }

    #[test]
    fn test_new_rejects_sub_cent_amounts() {
        let err = Transaction::new(at(2024, 1, 1), TransactionKind::Deposit, dec!(0.004), "d")
            .unwrap_err();
        assert!(matches!(err, TransactionError::TooPrecise { .. }));
        assert!(
            Transaction::new(at(2024, 1, 1), TransactionKind::Deposit, dec!(1.2500), "d").is_ok()
        );
    }

    #[test]
    fn test_recorded_negates_outflows() {
        let withdrawal =
            Transaction::recorded(at(2024, 1, 1), TransactionKind::Withdrawal, dec!(200), "w");
        let deposit = Transaction::recorded(at(2024, 1, 1), TransactionKind::Deposit, dec!(50), "d");

        assert_eq!(withdrawal.amount(), dec!(-200));
        assert_eq!(deposit.amount(), dec!(50));
    }

    #[test]
    fn test_is_in_month_checks_year_and_month() {
        let tx = Transaction::recorded(at(2024, 3, 15), TransactionKind::Withdrawal, dec!(1), "w");

        assert!(tx.is_in_month(2024, 3));
        assert!(!tx.is_in_month(2024, 4));
        assert!(!tx.is_in_month(2023, 3));
    }

    #[test]
    fn test_history_record_conversion() {
        let record = HistoryRecord {
            account: 1,
            timestamp: at(2024, 5, 1),
            kind: TransactionKind::Fee,
            amount: dec!(-4.77),
            description: "Withdrawal fee".to_string(),
        };
        let tx = Transaction::try_from(record).unwrap();

        assert_eq!(tx.kind(), TransactionKind::Fee);
        assert_eq!(tx.amount(), dec!(-4.77));
        assert_eq!(tx.description(), "Withdrawal fee");
    }
}
