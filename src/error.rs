use crate::domain::account::AccountId;
use thiserror::Error;

/// Which side of a transfer an account was looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Source,
    Destination,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Source => f.write_str("Source"),
            AccountRole::Destination => f.write_str("Destination"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BankError {
    #[error("{role} account {id} not found")]
    AccountNotFound { role: AccountRole, id: AccountId },
    #[error("User {username} does not own account {id}")]
    WrongOwner { username: String, id: AccountId },
    #[error("Insufficient funds in account {id}")]
    InsufficientFunds { id: AccountId },
    #[error("Balance of account {id} would exceed the representable range")]
    BalanceOverflow { id: AccountId },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BankError {
    /// Stable machine-readable name of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            BankError::AccountNotFound { .. } => "not_found",
            BankError::WrongOwner { .. } => "wrong_owner",
            BankError::InsufficientFunds { .. } => "insufficient_funds",
            BankError::BalanceOverflow { .. } => "balance_overflow",
            BankError::ValidationError(_) => "validation",
            BankError::Unauthorized(_) => "unauthorized",
            _ => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, BankError>;
