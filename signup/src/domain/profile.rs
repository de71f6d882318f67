//! Account profile record.
//!
//! The profile is the application-level user data kept alongside the
//! identity provider's own account record, keyed by the issued account id.
//! It is created exactly once at successful registration and mutated only by
//! explicit update operations; this core never deletes one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::{AccountHandle, AccountId};
use super::email::EmailAddress;
use super::form::Role;

/// Persisted user profile keyed by the identity-service account id.
///
/// ## Serde contract
/// camelCase field names, matching the document shape adapters persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct AccountProfile {
    /// Identity-service account id (record key).
    pub account_id: AccountId,
    /// Name shown to other users.
    pub display_name: String,
    /// Canonical sign-in email.
    pub email: EmailAddress,
    /// Role granted at registration.
    pub role: Role,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl AccountProfile {
    /// Profile written at successful registration.
    pub fn new_registration(
        account_id: AccountId,
        display_name: impl Into<String>,
        email: EmailAddress,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            display_name: display_name.into(),
            email,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Minimal profile substituted when the stored record is missing or the
    /// fetch fails: display name from the email's local part, role regular.
    ///
    /// Keeps the signed-in transition independent of profile-store health.
    pub fn fallback_for(account: &AccountHandle, now: DateTime<Utc>) -> Self {
        Self::new_registration(
            account.id().clone(),
            account.email().local_part(),
            account.email().clone(),
            Role::Regular,
            now,
        )
    }

    /// Shallow-merge explicitly updated fields into this profile.
    pub fn apply(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        let ProfilePatch { display_name, role } = patch;
        let mut touched = false;
        if let Some(display_name) = display_name {
            self.display_name = display_name;
            touched = true;
        }
        if let Some(role) = role {
            self.role = role;
            touched = true;
        }
        if touched {
            self.updated_at = now;
        }
    }
}

/// Fields a caller may merge into a cached profile after an external edit.
///
/// Deliberately excludes the account id and email so a merge can never
/// re-key a record or desynchronise it from the session's account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    /// Replacement display name, if changed.
    pub display_name: Option<String>,
    /// Replacement role, if changed.
    pub role: Option<Role>,
}
