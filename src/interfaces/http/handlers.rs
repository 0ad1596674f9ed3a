use super::AppState;
use super::auth::Authenticated;
use super::extract::{ApiJson, ApiQuery};
use crate::domain::account::{Account, AccountId};
use crate::domain::search::{Page, PageRequest, TransactionSearchCriteria, parse_date_bound};
use crate::domain::transaction::{Transaction, TransferCommand};
use crate::error::{BankError, Result};
use axum::Json;
use axum::extract::State;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub title: String,
}

impl From<TransferRequest> for TransferCommand {
    fn from(request: TransferRequest) -> Self {
        Self {
            source_account_id: request.source_account_id,
            destination_account_id: request.destination_account_id,
            amount: request.amount,
            title: request.title,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: u64,
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub title: String,
    pub transaction_date: NaiveDateTime,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            source_account_id: tx.source_account_id,
            destination_account_id: tx.destination_account_id,
            amount: tx.amount,
            title: tx.title,
            transaction_date: tx.transaction_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub username: String,
    pub balance: Decimal,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            balance: account.balance.0,
        }
    }
}

// Query parameters for transaction search
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(alias = "userId")]
    pub account_id: Option<AccountId>,
    pub amount_from: Option<Decimal>,
    pub amount_to: Option<Decimal>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl SearchQuery {
    pub fn criteria(&self) -> Result<TransactionSearchCriteria> {
        Ok(TransactionSearchCriteria {
            account_id: self.account_id,
            amount_from: self.amount_from,
            amount_to: self.amount_to,
            date_from: self.date_from.as_deref().map(parse_date_bound).transpose()?,
            date_to: self.date_to.as_deref().map(parse_date_bound).transpose()?,
        })
    }
}

/// Transfer funds from one of the caller's accounts
pub async fn transfer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(request): ApiJson<TransferRequest>,
) -> std::result::Result<Json<TransactionResponse>, BankError> {
    info!(user = %caller.username, ?request, "POST /api/v1/transactions/transfer");

    let tx = state.service.make_transfer(&caller, request.into()).await?;
    Ok(Json(tx.into()))
}

/// Search transactions with optional filters and pagination
pub async fn search(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> std::result::Result<Json<Page<TransactionResponse>>, BankError> {
    info!(user = %caller.username, ?query, "GET /api/v1/transactions/search");

    let criteria = query.criteria()?;
    let page = PageRequest::bounded(query.page, query.size, state.max_page_size)?;
    let found = state.service.find_transactions(&criteria, page).await?;
    Ok(Json(found.map(TransactionResponse::from)))
}

/// List the caller's accounts
pub async fn accounts(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> std::result::Result<Json<Vec<AccountResponse>>, BankError> {
    info!(user = %caller.username, "GET /api/v1/accounts");

    let accounts = state.service.list_accounts(Some(caller.username.as_str())).await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}
