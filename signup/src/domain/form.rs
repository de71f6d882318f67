//! Registration form snapshot and field naming.
//!
//! The form is a caller-owned mutable value: the UI mutates it between edits
//! and hands a snapshot to the validation engine per pass. It is never
//! persisted; only the derived [`AccountProfile`](super::AccountProfile)
//! record is written at successful registration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role selected at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary account.
    Regular,
    /// Administrative account.
    Admin,
}

impl Role {
    /// Stable machine-readable role code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "regular" => Ok(Self::Regular),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole {
                raw: other.to_owned(),
            }),
        }
    }
}

/// Error returned when parsing an unrecognised role code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {raw}")]
pub struct UnknownRole {
    /// The rejected input.
    pub raw: String,
}

/// Registration form fields, ordered as they appear on screen.
///
/// The derived ordering drives "first errored field" focus hints, so the
/// declaration order must match the visual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Role,
}

impl FieldName {
    /// Stable field path shared with adapters (camelCase, wire convention).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw registration input as typed by the user.
///
/// Fields hold unnormalised text; trimming and lowercasing happen inside the
/// full validation tier. `role` is `None` until a selection is made, which
/// the rules report as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Full name as typed.
    pub name: String,
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
    /// Password confirmation as typed.
    pub confirm_password: String,
    /// Selected role, if any.
    pub role: Option<Role>,
}

impl Default for RegistrationForm {
    /// Empty form with the role preselected to [`Role::Regular`], matching
    /// the initial state a registration screen presents.
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: Some(Role::Regular),
        }
    }
}
