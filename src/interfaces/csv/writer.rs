use crate::domain::account::Account;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Writes accounts or transactions as CSV, header row included.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: impl IntoIterator<Item = Account>) -> Result<()> {
        self.write_all(accounts)
    }

    pub fn write_transactions(
        &mut self,
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> Result<()> {
        self.write_all(transactions)
    }

    fn write_all<T: Serialize>(&mut self, records: impl IntoIterator<Item = T>) -> Result<()> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
