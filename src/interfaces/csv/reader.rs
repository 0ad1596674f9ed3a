use crate::domain::account::Account;
use crate::domain::principal::UserCredential;
use crate::domain::transaction::Transaction;
use crate::error::{BankError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads records from a CSV source with a header row.
///
/// This reader wraps `csv::Reader` and provides iterators over
/// `Result<T>`. It handles whitespace trimming and flexible record lengths
/// automatically.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecordReader<R> {
    /// Creates a new `RecordReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records<T: DeserializeOwned>(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BankError::from))
    }

    /// Rows of `id,username,balance`.
    pub fn accounts(self) -> impl Iterator<Item = Result<Account>> {
        self.records()
    }

    /// Rows of `id,source_account_id,destination_account_id,amount,title,transaction_date`.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.records()
    }

    /// Rows of `username,password_sha256`.
    pub fn users(self) -> impl Iterator<Item = Result<UserCredential>> {
        self.records()
    }
}
