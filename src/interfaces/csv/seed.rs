//! Loading accounts, transaction history and users from CSV files.
//!
//! Malformed rows are logged and skipped so one bad line does not prevent
//! the rest of a file from loading.

use super::reader::RecordReader;
use crate::domain::ports::{AccountStore, TransactionStore};
use crate::domain::principal::Credentials;
use crate::error::Result;
use std::io::Read;
use tracing::{info, warn};

/// Stores every valid account row; returns how many were imported.
pub async fn import_accounts<R: Read>(source: R, store: &dyn AccountStore) -> Result<usize> {
    let mut imported = 0;
    for row in RecordReader::new(source).accounts() {
        match row {
            Ok(account) => {
                store.store(account).await?;
                imported += 1;
            }
            Err(e) => warn!("Error reading account: {}", e),
        }
    }
    info!(imported, "accounts imported");
    Ok(imported)
}

/// Stores every valid transaction row under its own id. Rows with a
/// negative amount are skipped like malformed ones.
pub async fn import_transactions<R: Read>(
    source: R,
    store: &dyn TransactionStore,
) -> Result<usize> {
    let mut imported = 0;
    for row in RecordReader::new(source).transactions() {
        match row {
            Ok(tx) if tx.amount.is_sign_negative() => {
                warn!("Error reading transaction: {} has negative amount {}", tx.id, tx.amount);
            }
            Ok(tx) => {
                store.store(tx).await?;
                imported += 1;
            }
            Err(e) => warn!("Error reading transaction: {}", e),
        }
    }
    info!(imported, "transactions imported");
    Ok(imported)
}

pub fn load_credentials<R: Read>(source: R) -> Credentials {
    RecordReader::new(source)
        .users()
        .filter_map(|row| {
            row.map_err(|e| warn!("Error reading user: {}", e)).ok()
        })
        .collect()
}
