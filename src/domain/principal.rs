use crate::error::{BankError, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::warn;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// A user entry as it appears in the credentials file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct UserCredential {
    pub username: String,
    /// Lowercase hex SHA-256 of the password.
    pub password_sha256: String,
}

type Digest256 = [u8; 32];

/// Known users and their password digests.
#[derive(Debug, Default, Clone)]
pub struct Credentials {
    users: HashMap<String, Digest256>,
}

/// Compares two digests without exiting early on the first differing byte.
fn digests_match(expected: &Digest256, actual: &[u8]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if the digest is not 64 hex characters.
    pub fn insert(&mut self, credential: UserCredential) -> Result<()> {
        let mut digest = [0u8; 32];
        hex::decode_to_slice(credential.password_sha256.trim(), &mut digest).map_err(|e| {
            BankError::ValidationError(format!(
                "Invalid password digest for user {}: {e}",
                credential.username
            ))
        })?;
        self.users.insert(credential.username, digest);
        Ok(())
    }

    /// Returns the principal if the password matches the stored digest.
    ///
    /// The password is hashed even for unknown users.
    pub fn verify(&self, username: &str, password: &str) -> Option<Principal> {
        let actual = Sha256::digest(password.as_bytes());
        let expected = self.users.get(username);
        let known = expected.is_some();
        let matches = digests_match(expected.unwrap_or(&[0u8; 32]), actual.as_slice());
        (known && matches).then(|| Principal::new(username))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<UserCredential> for Credentials {
    /// Entries with a malformed digest are logged and skipped.
    fn from_iter<I: IntoIterator<Item = UserCredential>>(iter: I) -> Self {
        let mut credentials = Self::new();
        for credential in iter {
            if let Err(e) = credentials.insert(credential) {
                warn!("Error reading user: {}", e);
            }
        }
        credentials
    }
}
