//! Identity-service account handles.
//!
//! The identity provider is the system of record for authentication; it
//! issues the account id at creation time. The core treats that id as an
//! opaque non-empty string rather than assuming any provider-specific shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::email::EmailAddress;

/// Validation errors returned by [`AccountId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdValidationError {
    /// Identifier was missing or blank once trimmed.
    #[error("account id must not be empty")]
    Empty,
    /// Identifier carried surrounding whitespace.
    #[error("account id must not contain surrounding whitespace")]
    ContainsWhitespace,
}

/// Opaque account identifier issued by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate and construct an [`AccountId`].
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountIdValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AccountIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(AccountIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated-account handle surfaced by session-change notifications.
///
/// Carries just enough identity data for the core: the issued id (the
/// profile-store key) and the sign-in email (fallback display-name source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHandle {
    id: AccountId,
    email: EmailAddress,
}

impl AccountHandle {
    /// Build a handle from validated components.
    pub fn new(id: AccountId, email: EmailAddress) -> Self {
        Self { id, email }
    }

    /// Account id issued by the identity service.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Email the account authenticated with.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}
