use super::locks::AccountLocks;
use crate::domain::account::{Account, AccountId};
use crate::domain::ports::{AccountStore, Ledger, TransactionStore, UnitOfWork};
use crate::domain::search::{Page, PageRequest, TransactionFilter};
use crate::domain::transaction::{NewTransaction, Transaction, TransactionId};
use crate::error::{BankError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing transaction history.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for bookkeeping such as the transaction id sequence.
pub const CF_META: &str = "meta";

const KEY_LAST_TRANSACTION_ID: &[u8] = b"last_transaction_id";

/// A persistent store implementation using RocksDB.
///
/// Accounts and transactions live in separate Column Families, keyed by
/// their big-endian id so iteration yields them in id order. A commit
/// writes the updated accounts, the new transaction and the id sequence in a
/// single `WriteBatch`.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    locks: AccountLocks,
    /// Serialises id allocation between concurrent commits.
    commit_lock: Arc<Mutex<()>>,
}

fn internal(message: String) -> BankError {
    BankError::InternalError(Box::new(std::io::Error::other(message)))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_ACCOUNTS, CF_TRANSACTIONS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            locks: AccountLocks::new(),
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("Column family {name} not found")))
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| internal(format!("Deserialization error: {e}"))),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = encode(value)?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) =
                item.map_err(|e| internal(format!("RocksDB iteration error: {e}")))?;
            let decoded = serde_json::from_slice(&value)
                .map_err(|e| internal(format!("Deserialization error: {e}")))?;
            items.push(decoded);
        }
        Ok(items)
    }

    fn last_transaction_id(&self) -> Result<TransactionId> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(cf, KEY_LAST_TRANSACTION_ID)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| internal("Corrupt transaction id sequence".to_string()))?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| internal(format!("Serialization error: {e}")))
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn store(&self, account: Account) -> Result<()> {
        self.write(CF_ACCOUNTS, &account.id.to_be_bytes(), &account)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        self.read(CF_ACCOUNTS, &id.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        self.scan(CF_ACCOUNTS)
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        let _commit = self.commit_lock.lock().await;
        let last = self.last_transaction_id()?;

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_TRANSACTIONS)?, tx.id.to_be_bytes(), encode(&tx)?);
        if tx.id > last {
            batch.put_cf(self.cf(CF_META)?, KEY_LAST_TRANSACTION_ID, tx.id.to_be_bytes());
        }
        self.db.write(&batch)?;
        Ok(())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.read(CF_TRANSACTIONS, &id.to_be_bytes())
    }

    async fn search(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Page<Transaction>> {
        let matching = self
            .scan::<Transaction>(CF_TRANSACTIONS)?
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect();
        Ok(Page::slice(matching, page))
    }
}

#[async_trait]
impl Ledger for RocksDBStore {
    async fn begin(&self, ids: &[AccountId]) -> Result<UnitOfWork> {
        let locks = self.locks.acquire(ids).await;
        let mut snapshots = Vec::with_capacity(locks.ids().len());
        for id in locks.ids() {
            if let Some(account) = self.read::<Account>(CF_ACCOUNTS, &id.to_be_bytes())? {
                snapshots.push(account);
            }
        }
        Ok(UnitOfWork::new(snapshots, Box::new(locks)))
    }

    async fn commit(&self, work: UnitOfWork, record: NewTransaction) -> Result<Transaction> {
        let _commit = self.commit_lock.lock().await;
        let tx = record.with_id(self.last_transaction_id()? + 1);

        let accounts_cf = self.cf(CF_ACCOUNTS)?;
        let mut batch = WriteBatch::default();
        for account in work.accounts() {
            batch.put_cf(accounts_cf, account.id.to_be_bytes(), encode(account)?);
        }
        batch.put_cf(self.cf(CF_TRANSACTIONS)?, tx.id.to_be_bytes(), encode(&tx)?);
        batch.put_cf(self.cf(CF_META)?, KEY_LAST_TRANSACTION_ID, tx.id.to_be_bytes());
        self.db.write(&batch)?;

        Ok(tx)
    }
}
