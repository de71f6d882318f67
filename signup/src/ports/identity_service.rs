//! Port for the external identity provider.
//!
//! The provider is the system of record for authentication: it creates
//! accounts, verifies credentials, owns the session, and pushes
//! session-change notifications. Failures carry the provider's raw error
//! code alongside a normalised kind so callers can branch on behaviour while
//! the [`MessageCatalog`](crate::messages::MessageCatalog) stays in charge of
//! user-facing wording.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::{AccountHandle, AccountId, EmailAddress};

/// Normalised identity-provider failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IdentityErrorKind {
    /// Another account already uses this email.
    EmailInUse,
    /// The provider rejected the email syntax.
    InvalidEmail,
    /// The provider rejected the password as too weak.
    WeakPassword,
    /// No account exists for the email.
    NotFound,
    /// The password does not match the account.
    WrongPassword,
    /// The provider throttled repeated attempts.
    TooManyAttempts,
    /// The account has been disabled.
    Disabled,
    /// Any other provider failure.
    Other,
}

/// Failure surfaced by an identity-service adapter.
///
/// `provider_code` is the provider's own vocabulary (e.g. Firebase's
/// `auth/email-already-in-use`); `message` is the provider's raw text, used
/// verbatim when no catalogue entry maps the code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity service failure {provider_code}: {message}")]
pub struct IdentityError {
    kind: IdentityErrorKind,
    provider_code: String,
    message: String,
}

impl IdentityError {
    /// Build an error from a normalised kind plus the provider's raw code
    /// and message.
    pub fn new(
        kind: IdentityErrorKind,
        provider_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            provider_code: provider_code.into(),
            message: message.into(),
        }
    }

    /// Helper for failures outside the normalised vocabulary.
    pub fn other(provider_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(IdentityErrorKind::Other, provider_code, message)
    }

    /// Normalised failure category.
    pub const fn kind(&self) -> IdentityErrorKind {
        self.kind
    }

    /// Provider-specific error code.
    pub fn provider_code(&self) -> &str {
        self.provider_code.as_str()
    }

    /// Provider's raw failure message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Session-change subscription handle.
///
/// Holds the current session (`None` = signed out) and wakes watchers on
/// every sign-in or sign-out, so a fresh subscriber observes the current
/// state immediately. Dropping the receiver ends the subscription.
pub type SessionChanges = watch::Receiver<Option<AccountHandle>>;

/// Driving port onto the external identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an account and establish a session for it.
    async fn create_account(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AccountHandle, IdentityError>;

    /// Verify credentials and establish a session.
    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AccountHandle, IdentityError>;

    /// Terminate the current session, if any.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Ask the provider to send a password-reset message.
    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityError>;

    /// Subscribe to session-change notifications.
    fn subscribe_session_changes(&self) -> SessionChanges;
}

struct StoredAccount {
    id: AccountId,
    password: String,
}

/// In-memory identity provider for tests and local development.
///
/// Mirrors the hosted-provider behaviour the rest of the core is written
/// against: account creation signs the new account in, sign-out clears the
/// session, and every change is pushed to subscribers. Emails arrive already
/// validated as [`EmailAddress`], so the fixture never raises
/// [`IdentityErrorKind::InvalidEmail`].
pub struct FixtureIdentityService {
    accounts: Mutex<HashMap<EmailAddress, StoredAccount>>,
    session: watch::Sender<Option<AccountHandle>>,
}

impl FixtureIdentityService {
    /// Provider password policy floor, matching common hosted defaults.
    const MIN_PASSWORD_LEN: usize = 6;

    /// Start with no accounts and no session.
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            session,
        }
    }

    /// Currently signed-in account, if any.
    pub fn current_session(&self) -> Option<AccountHandle> {
        self.session.borrow().clone()
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<EmailAddress, StoredAccount>> {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for FixtureIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityService for FixtureIdentityService {
    async fn create_account(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AccountHandle, IdentityError> {
        if password.len() < Self::MIN_PASSWORD_LEN {
            return Err(IdentityError::new(
                IdentityErrorKind::WeakPassword,
                "auth/weak-password",
                "password should be at least 6 characters",
            ));
        }

        let handle = {
            let mut accounts = self.lock_accounts();
            if accounts.contains_key(email) {
                return Err(IdentityError::new(
                    IdentityErrorKind::EmailInUse,
                    "auth/email-already-in-use",
                    "the email address is already in use by another account",
                ));
            }
            let id = AccountId::new(Uuid::new_v4().to_string()).map_err(|err| {
                IdentityError::other("fixture/bad-id", format!("generated id rejected: {err}"))
            })?;
            accounts.insert(
                email.clone(),
                StoredAccount {
                    id: id.clone(),
                    password: password.to_owned(),
                },
            );
            AccountHandle::new(id, email.clone())
        };

        self.session.send_replace(Some(handle.clone()));
        Ok(handle)
    }

    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AccountHandle, IdentityError> {
        let handle = {
            let accounts = self.lock_accounts();
            let stored = accounts.get(email).ok_or_else(|| {
                IdentityError::new(
                    IdentityErrorKind::NotFound,
                    "auth/user-not-found",
                    "no user record for this identifier",
                )
            })?;
            if stored.password != password {
                return Err(IdentityError::new(
                    IdentityErrorKind::WrongPassword,
                    "auth/wrong-password",
                    "the password is invalid",
                ));
            }
            AccountHandle::new(stored.id.clone(), email.clone())
        };

        self.session.send_replace(Some(handle.clone()));
        Ok(handle)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.session.send_replace(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityError> {
        let accounts = self.lock_accounts();
        if accounts.contains_key(email) {
            Ok(())
        } else {
            Err(IdentityError::new(
                IdentityErrorKind::NotFound,
                "auth/user-not-found",
                "no user record for this identifier",
            ))
        }
    }

    fn subscribe_session_changes(&self) -> SessionChanges {
        self.session.subscribe()
    }
}
