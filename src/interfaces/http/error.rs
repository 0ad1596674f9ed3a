use crate::error::BankError;
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

impl BankError {
    pub fn status(&self) -> StatusCode {
        match self {
            BankError::AccountNotFound { .. } => StatusCode::NOT_FOUND,
            BankError::WrongOwner { .. } => StatusCode::FORBIDDEN,
            BankError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BankError::BalanceOverflow { .. } => StatusCode::CONFLICT,
            BankError::ValidationError(_) => StatusCode::BAD_REQUEST,
            BankError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert BankError to a JSON error response
impl IntoResponse for BankError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"funds-transfer\""),
            );
        }
        response
    }
}
