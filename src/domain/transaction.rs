use super::account::{AccountId, Amount};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type TransactionId = u64;

/// A recorded movement of funds between two accounts. Immutable once stored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub title: String,
    pub transaction_date: NaiveDateTime,
}

/// A transaction that has not been assigned an identifier yet.
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Amount,
    pub title: String,
    pub transaction_date: NaiveDateTime,
}

impl NewTransaction {
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            source_account_id: self.source_account_id,
            destination_account_id: self.destination_account_id,
            amount: self.amount.value(),
            title: self.title,
            transaction_date: self.transaction_date,
        }
    }
}

/// Request to move `amount` from the source to the destination account.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct TransferCommand {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub title: String,
}

impl Transaction {
    /// True if the account is on either side of the transaction.
    pub fn involves(&self, account_id: AccountId) -> bool {
        self.source_account_id == account_id || self.destination_account_id == account_id
    }
}
