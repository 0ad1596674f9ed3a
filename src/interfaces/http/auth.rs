use super::AppState;
use crate::domain::principal::Principal;
use crate::error::BankError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Caller authenticated with HTTP Basic against the configured credentials.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

fn unauthorized(message: &str) -> BankError {
    BankError::Unauthorized(message.to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = BankError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing credentials"))?;
        let encoded = value
            .strip_prefix("Basic ")
            .ok_or_else(|| unauthorized("Unsupported authorization scheme"))?;
        let decoded = STANDARD
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| unauthorized("Malformed credentials"))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| unauthorized("Malformed credentials"))?;

        state
            .credentials
            .verify(username, password)
            .map(Authenticated)
            .ok_or_else(|| unauthorized("Invalid credentials"))
    }
}
