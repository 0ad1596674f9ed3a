//! Transaction search criteria and the predicates they compile to.

use super::account::AccountId;
use super::transaction::Transaction;
use crate::error::{BankError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Optional search filters. Every filter that is set must match.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionSearchCriteria {
    /// Matches transactions where the account is either source or destination.
    pub account_id: Option<AccountId>,
    pub amount_from: Option<Decimal>,
    pub amount_to: Option<Decimal>,
    pub date_from: Option<NaiveDateTime>,
    /// Promoted to the end of its day when the filter is built.
    pub date_to: Option<NaiveDateTime>,
}

/// A single condition on a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Participant(AccountId),
    AmountAtLeast(Decimal),
    AmountAtMost(Decimal),
    OnOrAfter(NaiveDateTime),
    OnOrBefore(NaiveDateTime),
}

impl Predicate {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Predicate::Participant(id) => tx.involves(*id),
            Predicate::AmountAtLeast(min) => tx.amount >= *min,
            Predicate::AmountAtMost(max) => tx.amount <= *max,
            Predicate::OnOrAfter(from) => tx.transaction_date >= *from,
            Predicate::OnOrBefore(to) => tx.transaction_date <= *to,
        }
    }
}

/// Conjunction of predicates. An empty filter matches everything.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    predicates: Vec<Predicate>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn from_criteria(criteria: &TransactionSearchCriteria) -> Self {
        let mut filter = Self::all();
        if let Some(id) = criteria.account_id {
            filter = filter.and(Predicate::Participant(id));
        }
        if let Some(min) = criteria.amount_from {
            filter = filter.and(Predicate::AmountAtLeast(min));
        }
        if let Some(max) = criteria.amount_to {
            filter = filter.and(Predicate::AmountAtMost(max));
        }
        if let Some(from) = criteria.date_from {
            filter = filter.and(Predicate::OnOrAfter(from));
        }
        if let Some(to) = criteria.date_to {
            filter = filter.and(Predicate::OnOrBefore(end_of_day(to.date())));
        }
        filter
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.predicates.iter().all(|p| p.matches(tx))
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of the day, 23:59:59.999999999.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or(NaiveDateTime::MAX)
}

/// Parses a date bound given either as `YYYY-MM-DD` or as a full
/// `YYYY-MM-DDTHH:MM:SS[.f]` timestamp. Date-only input means start of day.
pub fn parse_date_bound(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| BankError::ValidationError(format!("Invalid date: {input}")))
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(BankError::ValidationError(
                "Page size must be positive".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    /// Builds a request from optional parameters, capping the size at `max_size`.
    pub fn bounded(page: Option<u32>, size: Option<u32>, max_size: u32) -> Result<Self> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).min(max_size);
        Self::new(page.unwrap_or(0), size)
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Cuts one page out of the full, already ordered result set.
    pub fn slice(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let total_pages = total_elements.div_ceil(request.size as u64) as u32;
        let content = items
            .into_iter()
            .skip(request.offset())
            .take(request.size as usize)
            .collect();
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
