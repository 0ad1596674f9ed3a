//! `Json` and `Query` wrappers whose rejections become `BankError`s, so
//! malformed input gets the same JSON error body as every other failure.

use crate::error::BankError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BankError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BankError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for BankError {
    fn from(rejection: JsonRejection) -> Self {
        BankError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for BankError {
    fn from(rejection: QueryRejection) -> Self {
        BankError::ValidationError(rejection.body_text())
    }
}
