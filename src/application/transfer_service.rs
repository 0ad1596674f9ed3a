use crate::domain::account::{Account, AccountId, Amount};
use crate::domain::ports::{AccountStoreBox, ClockRef, LedgerBox, TransactionStoreBox};
use crate::domain::principal::Principal;
use crate::domain::search::{Page, PageRequest, TransactionFilter, TransactionSearchCriteria};
use crate::domain::transaction::{NewTransaction, Transaction, TransferCommand};
use crate::error::{AccountRole, BankError, Result};
use tracing::{debug, info, warn};

fn missing(role: AccountRole, id: AccountId) -> BankError {
    BankError::AccountNotFound { role, id }
}

/// Moves funds between accounts and answers transaction queries.
///
/// The service owns its storage ports. Every transfer runs inside one unit of
/// work obtained from the `Ledger`: the accounts involved stay locked from
/// the first balance read until the commit, and any early return drops the
/// unit of work, discarding its changes.
pub struct TransferService {
    accounts: AccountStoreBox,
    transactions: TransactionStoreBox,
    ledger: LedgerBox,
    clock: ClockRef,
}

impl TransferService {
    /// Creates a new `TransferService`.
    ///
    /// # Arguments
    ///
    /// * `accounts` - Read access to accounts.
    /// * `transactions` - Transaction history and search.
    /// * `ledger` - Locked, atomic account updates.
    /// * `clock` - Source of transaction timestamps.
    pub fn new(
        accounts: AccountStoreBox,
        transactions: TransactionStoreBox,
        ledger: LedgerBox,
        clock: ClockRef,
    ) -> Self {
        Self {
            accounts,
            transactions,
            ledger,
            clock,
        }
    }

    /// Transfers `command.amount` from the source to the destination account.
    ///
    /// Fails with `AccountNotFound` if either account is missing,
    /// `WrongOwner` if the caller does not own the source account and
    /// `InsufficientFunds` if the source balance does not cover the amount.
    /// On failure no balance changes and no transaction is recorded.
    pub async fn make_transfer(
        &self,
        caller: &Principal,
        command: TransferCommand,
    ) -> Result<Transaction> {
        let amount = Amount::new(command.amount)?;
        let source_id = command.source_account_id;
        let destination_id = command.destination_account_id;
        if source_id == destination_id {
            return Err(BankError::ValidationError(
                "Source and destination accounts must differ".to_string(),
            ));
        }
        let title = command.title.trim();
        if title.is_empty() {
            return Err(BankError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }

        let mut work = self.ledger.begin(&[source_id, destination_id]).await?;

        let source = work
            .account(source_id)
            .ok_or_else(|| missing(AccountRole::Source, source_id))?;
        if !source.is_owned_by(&caller.username) {
            warn!(user = %caller.username, account = source_id, "transfer from foreign account rejected");
            return Err(BankError::WrongOwner {
                username: caller.username.clone(),
                id: source_id,
            });
        }
        if work.account(destination_id).is_none() {
            return Err(missing(AccountRole::Destination, destination_id));
        }

        work.account_mut(source_id)
            .ok_or_else(|| missing(AccountRole::Source, source_id))?
            .debit(amount)?;
        work.account_mut(destination_id)
            .ok_or_else(|| missing(AccountRole::Destination, destination_id))?
            .credit(amount)?;

        let record = NewTransaction {
            source_account_id: source_id,
            destination_account_id: destination_id,
            amount,
            title: title.to_string(),
            transaction_date: self.clock.now(),
        };
        let tx = self.ledger.commit(work, record).await?;

        info!(
            tx = tx.id,
            source = source_id,
            destination = destination_id,
            amount = %tx.amount,
            "transfer committed"
        );
        Ok(tx)
    }

    /// Returns one page of the transactions matching every given criterion,
    /// ordered by transaction id.
    pub async fn find_transactions(
        &self,
        criteria: &TransactionSearchCriteria,
        page: PageRequest,
    ) -> Result<Page<Transaction>> {
        let filter = TransactionFilter::from_criteria(criteria);
        debug!(predicates = ?filter.predicates(), ?page, "searching transactions");
        self.transactions.search(&filter, page).await
    }

    /// Lists accounts ordered by id, optionally only those of one owner.
    pub async fn list_accounts(&self, owner: Option<&str>) -> Result<Vec<Account>> {
        let accounts = self.accounts.get_all().await?;
        Ok(match owner {
            Some(username) => accounts
                .into_iter()
                .filter(|account| account.is_owned_by(username))
                .collect(),
            None => accounts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use crate::domain::ports::{AccountStore, FixedClock, TransactionStore};
    use crate::infrastructure::in_memory::InMemoryStore;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    async fn setup() -> (TransferService, InMemoryStore) {
        let store = InMemoryStore::new();
        AccountStore::store(&store, Account::new(1, "User1", Balance::new(dec!(5000.00))))
            .await
            .unwrap();
        AccountStore::store(&store, Account::new(2, "User2", Balance::new(dec!(3000.00))))
            .await
            .unwrap();

        let service = TransferService::new(
            Box::new(store.clone()),
            Box::new(store.clone()),
            Box::new(store.clone()),
            Arc::new(FixedClock(now())),
        );
        (service, store)
    }

    fn command(source: u64, destination: u64, amount: Decimal) -> TransferCommand {
        TransferCommand {
            source_account_id: source,
            destination_account_id: destination,
            amount,
            title: "Test Transfer".to_string(),
        }
    }

    async fn balance(store: &InMemoryStore, id: u64) -> Balance {
        AccountStore::get(store, id).await.unwrap().unwrap().balance
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_and_records_transaction() {
        let (service, store) = setup().await;

        let tx = service
            .make_transfer(&Principal::new("User1"), command(1, 2, dec!(1000.0)))
            .await
            .unwrap();

        assert_eq!(balance(&store, 1).await, Balance::new(dec!(4000.00)));
        assert_eq!(balance(&store, 2).await, Balance::new(dec!(4000.00)));
        assert_eq!(tx.source_account_id, 1);
        assert_eq!(tx.destination_account_id, 2);
        assert_eq!(tx.amount, dec!(1000.0));
        assert_eq!(tx.title, "Test Transfer");
        assert_eq!(tx.transaction_date, now());
        assert_eq!(TransactionStore::get(&store, tx.id).await.unwrap(), Some(tx));
    }

    #[tokio::test]
    async fn test_transfer_of_entire_balance_is_allowed() {
        let (service, store) = setup().await;

        service
            .make_transfer(&Principal::new("User1"), command(1, 2, dec!(5000.00)))
            .await
            .unwrap();

        assert_eq!(balance(&store, 1).await, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_balances_unchanged() {
        let (service, store) = setup().await;

        let result = service
            .make_transfer(&Principal::new("User1"), command(1, 2, dec!(5000.01)))
            .await;

        assert!(matches!(result, Err(BankError::InsufficientFunds { id: 1 })));
        assert_eq!(balance(&store, 1).await, Balance::new(dec!(5000.00)));
        assert_eq!(balance(&store, 2).await, Balance::new(dec!(3000.00)));
        let page = service
            .find_transactions(&TransactionSearchCriteria::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn test_wrong_owner_is_rejected() {
        let (service, store) = setup().await;

        let result = service
            .make_transfer(&Principal::new("User2"), command(1, 2, dec!(1.0)))
            .await;

        assert!(matches!(result, Err(BankError::WrongOwner { id: 1, .. })));
        assert_eq!(balance(&store, 1).await, Balance::new(dec!(5000.00)));
    }

    #[tokio::test]
    async fn test_missing_accounts_are_reported_by_side() {
        let (service, _store) = setup().await;
        let caller = Principal::new("User1");

        let result = service.make_transfer(&caller, command(9, 2, dec!(1.0))).await;
        assert!(matches!(
            result,
            Err(BankError::AccountNotFound {
                role: AccountRole::Source,
                id: 9
            })
        ));

        let result = service.make_transfer(&caller, command(1, 9, dec!(1.0))).await;
        assert!(matches!(
            result,
            Err(BankError::AccountNotFound {
                role: AccountRole::Destination,
                id: 9
            })
        ));
    }

    #[tokio::test]
    async fn test_ownership_is_checked_before_destination_exists() {
        let (service, _store) = setup().await;

        let result = service
            .make_transfer(&Principal::new("User2"), command(1, 9, dec!(1.0)))
            .await;

        assert!(matches!(result, Err(BankError::WrongOwner { .. })));
    }

    #[tokio::test]
    async fn test_invalid_commands_are_rejected() {
        let (service, _store) = setup().await;
        let caller = Principal::new("User1");

        for bad in [
            command(1, 2, dec!(0)),
            command(1, 2, dec!(-5)),
            command(1, 1, dec!(5)),
            TransferCommand {
                title: "   ".to_string(),
                ..command(1, 2, dec!(5))
            },
        ] {
            let result = service.make_transfer(&caller, bad).await;
            assert!(matches!(result, Err(BankError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn test_destination_overflow_aborts_transfer() {
        let (service, store) = setup().await;
        AccountStore::store(&store, Account::new(2, "User2", Balance::new(Decimal::MAX)))
            .await
            .unwrap();

        let result = service
            .make_transfer(&Principal::new("User1"), command(1, 2, dec!(1)))
            .await;

        assert!(matches!(result, Err(BankError::BalanceOverflow { id: 2 })));
        assert_eq!(balance(&store, 1).await, Balance::new(dec!(5000.00)));
        assert_eq!(balance(&store, 2).await, Balance::new(Decimal::MAX));
    }

    #[tokio::test]
    async fn test_search_up_to_last_representable_day() {
        let (service, _store) = setup().await;
        service
            .make_transfer(&Principal::new("User1"), command(1, 2, dec!(1)))
            .await
            .unwrap();

        let criteria = TransactionSearchCriteria {
            date_to: Some(NaiveDate::MAX.and_time(NaiveTime::MIN)),
            ..Default::default()
        };
        let page = service
            .find_transactions(&criteria, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
    }

    #[tokio::test]
    async fn test_concurrent_opposite_transfers_conserve_total() {
        let (service, store) = setup().await;
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for i in 0..40 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let (caller, cmd) = if i % 2 == 0 {
                    ("User1", command(1, 2, dec!(10)))
                } else {
                    ("User2", command(2, 1, dec!(5)))
                };
                service.make_transfer(&Principal::new(caller), cmd).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(balance(&store, 1).await, Balance::new(dec!(4900.00)));
        assert_eq!(balance(&store, 2).await, Balance::new(dec!(3100.00)));
        let page = service
            .find_transactions(&TransactionSearchCriteria::default(), PageRequest::new(0, 100).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 40);
    }

    #[tokio::test]
    async fn test_list_accounts_by_owner() {
        let (service, _store) = setup().await;

        assert_eq!(service.list_accounts(None).await.unwrap().len(), 2);
        let own = service.list_accounts(Some("User2")).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, 2);
    }
}
