use super::locks::AccountLocks;
use crate::domain::account::{Account, AccountId};
use crate::domain::ports::{AccountStore, Ledger, TransactionStore, UnitOfWork};
use crate::domain::search::{Page, PageRequest, TransactionFilter};
use crate::domain::transaction::{NewTransaction, Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    accounts: BTreeMap<AccountId, Account>,
    transactions: BTreeMap<TransactionId, Transaction>,
}

impl State {
    fn next_transaction_id(&self) -> TransactionId {
        self.transactions
            .keys()
            .next_back()
            .map_or(1, |last| last + 1)
    }
}

/// A thread-safe in-memory store for accounts and transactions.
///
/// Account and transaction maps live behind one `RwLock`, so a commit
/// updates balances and appends the transaction in a single critical
/// section. Per-account locks for units of work come from `AccountLocks`.
/// `Clone` shares the underlying state.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    locks: AccountLocks,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn store(&self, account: Account) -> Result<()> {
        let mut state = self.state.write().await;
        state.accounts.insert(account.id, account);
        Ok(())
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().cloned().collect())
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        let mut state = self.state.write().await;
        state.transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let state = self.state.read().await;
        Ok(state.transactions.get(&id).cloned())
    }

    async fn search(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Page<Transaction>> {
        let state = self.state.read().await;
        let matching = state
            .transactions
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        Ok(Page::slice(matching, page))
    }
}

#[async_trait]
impl Ledger for InMemoryStore {
    async fn begin(&self, ids: &[AccountId]) -> Result<UnitOfWork> {
        let locks = self.locks.acquire(ids).await;
        let state = self.state.read().await;
        let snapshots: Vec<Account> = locks
            .ids()
            .iter()
            .filter_map(|id| state.accounts.get(id).cloned())
            .collect();
        Ok(UnitOfWork::new(snapshots, Box::new(locks)))
    }

    async fn commit(&self, work: UnitOfWork, record: NewTransaction) -> Result<Transaction> {
        let mut state = self.state.write().await;
        let tx = record.with_id(state.next_transaction_id());
        for account in work.accounts() {
            state.accounts.insert(account.id, account.clone());
        }
        state.transactions.insert(tx.id, tx.clone());
        Ok(tx)
    }
}
