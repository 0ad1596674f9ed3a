//! Storage adapters implementing the domain ports.

pub mod in_memory;
pub mod locks;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::domain::ports::{AccountStoreBox, LedgerBox, TransactionStoreBox};
use crate::error::Result;
use in_memory::InMemoryStore;
use std::path::Path;

/// The three ports, all backed by the same storage.
pub struct Stores {
    pub accounts: AccountStoreBox,
    pub transactions: TransactionStoreBox,
    pub ledger: LedgerBox,
}

impl Stores {
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            accounts: Box::new(store.clone()),
            transactions: Box::new(store.clone()),
            ledger: Box::new(store),
        }
    }

    #[cfg(feature = "storage-rocksdb")]
    pub fn rocksdb(path: &Path) -> Result<Self> {
        let store = self::rocksdb::RocksDBStore::open(path)?;
        Ok(Self {
            accounts: Box::new(store.clone()),
            transactions: Box::new(store.clone()),
            ledger: Box::new(store),
        })
    }

    /// Opens persistent storage when a path is given and the `storage-rocksdb`
    /// feature is compiled in; otherwise uses in-memory storage.
    pub fn open(db_path: Option<&Path>) -> Result<Self> {
        match db_path {
            #[cfg(feature = "storage-rocksdb")]
            Some(path) => {
                tracing::info!(path = %path.display(), "using RocksDB storage");
                Self::rocksdb(path)
            }
            #[cfg(not(feature = "storage-rocksdb"))]
            Some(_) => {
                tracing::warn!(
                    "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
                );
                Ok(Self::in_memory())
            }
            None => Ok(Self::in_memory()),
        }
    }
}
