//! Port for the external profile store.
//!
//! Profiles live in a key-value collection keyed by account id, separate
//! from the identity provider's own records. The email query exists solely
//! for the registration-time uniqueness probe.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{AccountId, AccountProfile, EmailAddress};

/// Errors surfaced by profile-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileStoreError {
    /// Store connectivity failures.
    #[error("profile store connection failed: {message}")]
    Connection { message: String },
    /// Read or write failed during execution.
    #[error("profile store query failed: {message}")]
    Query { message: String },
}

impl ProfileStoreError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Driven port for profile persistence and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile stored for an account, if any.
    async fn get_profile(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountProfile>, ProfileStoreError>;

    /// Write a profile under its account id, replacing any existing record.
    async fn set_profile(&self, profile: &AccountProfile) -> Result<(), ProfileStoreError>;

    /// Profiles registered under the given canonical email.
    async fn query_profiles_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<AccountProfile>, ProfileStoreError>;
}

/// In-memory profile store for tests and local development.
#[derive(Default)]
pub struct FixtureProfileStore {
    records: Mutex<HashMap<AccountId, AccountProfile>>,
}

impl FixtureProfileStore {
    /// Start with an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<AccountId, AccountProfile>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ProfileStore for FixtureProfileStore {
    async fn get_profile(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountProfile>, ProfileStoreError> {
        Ok(self.lock_records().get(account_id).cloned())
    }

    async fn set_profile(&self, profile: &AccountProfile) -> Result<(), ProfileStoreError> {
        self.lock_records()
            .insert(profile.account_id.clone(), profile.clone());
        Ok(())
    }

    async fn query_profiles_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<AccountProfile>, ProfileStoreError> {
        Ok(self
            .lock_records()
            .values()
            .filter(|profile| &profile.email == email)
            .cloned()
            .collect())
    }
}
