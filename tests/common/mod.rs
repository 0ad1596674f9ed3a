#![allow(dead_code)]

use assert_cmd::cargo_bin;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::process::Command;

pub const ACCOUNTS: &str = "tests/fixtures/accounts.csv";
pub const TRANSACTIONS: &str = "tests/fixtures/transactions.csv";

/// The binary with the fixture accounts and transaction history loaded.
pub fn seeded_command() -> Command {
    let mut cmd = Command::new(cargo_bin!("funds-transfer"));
    cmd.arg("--accounts")
        .arg(ACCOUNTS)
        .arg("--transactions")
        .arg(TRANSACTIONS);
    cmd
}

/// Writes `rows` accounts, each owned by `user<id>` and holding `balance`.
pub fn generate_accounts_csv(path: &Path, rows: usize, balance: &str) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["id", "username", "balance"])?;

    for i in 1..=rows {
        wtr.write_record([&i.to_string(), &format!("user{i}"), balance])?;
    }

    wtr.flush()?;
    Ok(())
}
