use super::account::{Account, AccountId};
use super::search::{Page, PageRequest, TransactionFilter};
use super::transaction::{NewTransaction, Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::collections::BTreeMap;
use std::sync::Arc;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn store(&self, account: Account) -> Result<()>;
    async fn get(&self, id: AccountId) -> Result<Option<Account>>;
    /// All accounts, ordered by id.
    async fn get_all(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Stores a transaction under its own id. Used to import history.
    async fn store(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>>;
    /// Matching transactions ordered by id, cut to the requested page.
    async fn search(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Page<Transaction>>;
}

/// Transactional access to accounts.
///
/// `begin` takes exclusive locks on the requested accounts and returns
/// snapshots of them. Changes made to the snapshots become visible only
/// through `commit`, which writes them together with the new transaction in
/// one atomic step. Dropping a `UnitOfWork` without committing discards the
/// changes and releases the locks.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn begin(&self, ids: &[AccountId]) -> Result<UnitOfWork>;
    async fn commit(&self, work: UnitOfWork, record: NewTransaction) -> Result<Transaction>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type LedgerBox = Box<dyn Ledger>;

/// Locked account snapshots. Accounts that do not exist are simply absent.
pub struct UnitOfWork {
    accounts: BTreeMap<AccountId, Account>,
    _guard: Box<dyn Send + Sync>,
}

impl UnitOfWork {
    /// `guard` is whatever keeps the accounts locked; it is released on drop.
    pub fn new(accounts: impl IntoIterator<Item = Account>, guard: Box<dyn Send + Sync>) -> Self {
        Self {
            accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
            _guard: guard,
        }
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub type ClockRef = Arc<dyn Clock>;
