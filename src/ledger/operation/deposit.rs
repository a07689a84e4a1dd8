use crate::ledger::{
    account::AccountId,
    error::TransactionError,
    operation::{OperationRecord, OperationType},
    transaction::has_valid_scale,
    Decimal,
};

/// A deposit into a single account on behalf of a named depositor.
#[derive(Debug, Clone)]
pub struct Deposit {
    account_id: AccountId,
    amount: Decimal,
    depositor: String,
}

impl Deposit {
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn depositor(&self) -> &str {
        &self.depositor
    }
}

impl TryFrom<OperationRecord> for Deposit {
    type Error = TransactionError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        match record {
            OperationRecord {
                op: OperationType::Deposit,
                account,
                to: None,
                amount: Some(amount),
                party,
            } if has_valid_scale(amount) => Ok(Deposit {
                account_id: account,
                amount,
                depositor: party.unwrap_or_default(),
            }),
            _ => Err(TransactionError::InvalidOperation(record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_record(amount: Option<Decimal>, party: Option<&str>) -> OperationRecord {
        OperationRecord {
            op: OperationType::Deposit,
            account: 1,
            to: None,
            amount,
            party: party.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_deposit() {
        let deposit = Deposit::try_from(make_record(Some(dec!(100.5)), Some("Alice"))).unwrap();

        assert_eq!(deposit.account_id(), 1);
        assert_eq!(deposit.amount(), dec!(100.5));
        assert_eq!(deposit.depositor(), "Alice");
    }

    #[test]
    fn test_missing_party_is_left_to_the_account() {
        let deposit = Deposit::try_from(make_record(Some(dec!(10)), None)).unwrap();
        assert_eq!(deposit.depositor(), "");
    }

    #[test]
    fn test_rejects_more_than_2_decimals() {
        assert!(Deposit::try_from(make_record(Some(dec!(0.004)), Some("Alice"))).is_err());
    }

    #[test]
    fn test_accepts_trailing_zeros() {
        let deposit = Deposit::try_from(make_record(Some(dec!(12.3000)), Some("Alice"))).unwrap();
        assert_eq!(deposit.amount(), dec!(12.3));
    }

    #[test]
    fn test_rejects_missing_amount() {
        assert!(Deposit::try_from(make_record(None, Some("Alice"))).is_err());
    }

    #[test]
    fn test_rejects_destination() {
        let mut record = make_record(Some(dec!(10)), Some("Alice"));
        record.to = Some(2);
        assert!(Deposit::try_from(record).is_err());
    }

    #[test]
    fn test_rejects_wrong_operation_type() {
        let mut record = make_record(Some(dec!(10)), Some("Alice"));
        record.op = OperationType::Withdraw;
        assert!(Deposit::try_from(record).is_err());
    }
}
