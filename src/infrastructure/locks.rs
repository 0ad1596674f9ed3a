use crate::domain::account::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as TableMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = Arc<TableMutex<HashMap<AccountId, Arc<Mutex<()>>>>>;

/// Table of per-account exclusive locks, shared by every unit of work of a store.
///
/// Locks are always acquired in ascending account id order, so two units of
/// work touching the same pair of accounts can never wait on each other in a
/// cycle. An entry lives only while some unit of work holds or waits for it.
#[derive(Default, Clone)]
pub struct AccountLocks {
    table: LockTable,
}

/// Held locks; dropping it releases them.
pub struct LockSet {
    ids: Vec<AccountId>,
    guards: Vec<OwnedMutexGuard<()>>,
    table: LockTable,
}

impl LockSet {
    /// Locked account ids, ascending.
    pub fn ids(&self) -> &[AccountId] {
        &self.ids
    }
}

impl Drop for LockSet {
    fn drop(&mut self) {
        self.guards.clear();
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        for id in &self.ids {
            // The table's own handle is the last one: nobody holds or awaits it.
            if table.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                table.remove(id);
            }
        }
    }
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, ids: &[AccountId]) -> LockSet {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut set = LockSet {
            ids: Vec::with_capacity(ordered.len()),
            guards: Vec::with_capacity(ordered.len()),
            table: self.table.clone(),
        };
        for id in ordered {
            let lock = self.entry(id);
            set.ids.push(id);
            set.guards.push(lock.lock_owned().await);
        }
        set
    }

    /// Number of accounts currently locked or awaited.
    pub fn tracked(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn entry(&self, id: AccountId) -> Arc<Mutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.entry(id).or_default().clone()
    }
}
