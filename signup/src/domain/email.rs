//! Email address value type.
//!
//! Addresses are normalised (trimmed, lowercased) on construction so every
//! downstream consumer (availability checks, account creation, profile
//! records) sees one canonical spelling.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Address was missing or blank once trimmed.
    #[error("email is required")]
    Empty,
    /// Address does not look like `local@domain.tld`.
    #[error("invalid email format")]
    Invalid,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lowercased.
/// - Matches `local@domain.tld` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`], normalising the input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(&normalized) {
            return Err(EmailValidationError::Invalid);
        }
        Ok(Self(normalized))
    }

    /// Cheap shape test used by the quick validation tier and for gating the
    /// availability check: some text, an `@`, and some text either side.
    pub fn has_basic_shape(raw: &str) -> bool {
        let trimmed = raw.trim();
        match trimmed.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        }
    }

    /// Borrow the canonical address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Substring before the `@`, used to synthesize fallback display names.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
