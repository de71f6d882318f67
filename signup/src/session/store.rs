//! Single-writer session store.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{AccountHandle, AccountProfile, ProfilePatch, Role};
use crate::ports::{IdentityError, IdentityService, ProfileStore};

/// Lifecycle phase of the mirrored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No notification received yet (process start).
    Loading,
    /// Provider reports no session.
    SignedOut,
    /// Provider reports an authenticated account.
    SignedIn,
}

/// Snapshot of the mirrored session.
///
/// ## Invariants
/// - `status == SignedIn` iff `account.is_some()`.
/// - `profile` is best-effort: while a fetch is pending it may still be
///   `None` for a signed-in session; on fetch failure a synthesized fallback
///   is substituted rather than leaving it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    status: SessionStatus,
    account: Option<AccountHandle>,
    profile: Option<AccountProfile>,
}

impl SessionState {
    const fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            account: None,
            profile: None,
        }
    }

    const fn signed_out() -> Self {
        Self {
            status: SessionStatus::SignedOut,
            account: None,
            profile: None,
        }
    }

    const fn signed_in(account: AccountHandle, profile: Option<AccountProfile>) -> Self {
        Self {
            status: SessionStatus::SignedIn,
            account: Some(account),
            profile,
        }
    }

    /// Current lifecycle phase.
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Authenticated account, when signed in.
    pub const fn account(&self) -> Option<&AccountHandle> {
        self.account.as_ref()
    }

    /// Cached profile record, when available.
    pub const fn profile(&self) -> Option<&AccountProfile> {
        self.profile.as_ref()
    }

    /// True once the provider reports an authenticated account.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::SignedIn
    }

    /// True when the cached profile grants the admin role.
    pub fn is_admin(&self) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|profile| profile.role == Role::Admin)
    }
}

/// Process-local mirror of the identity provider's session.
///
/// Construct one per process (or per test) with injected ports; there is no
/// ambient global. All writes flow through the provider subscription consumed
/// by [`SessionStore::run`] plus the explicit [`SessionStore::sign_out`] and
/// [`SessionStore::merge_profile`] operations; readers only ever take
/// snapshots or watch subscriptions.
pub struct SessionStore<I, P> {
    identity: Arc<I>,
    profiles: Arc<P>,
    state: watch::Sender<SessionState>,
}

impl<I, P> SessionStore<I, P>
where
    I: IdentityService,
    P: ProfileStore,
{
    /// New store in the `Loading` state.
    pub fn new(identity: Arc<I>, profiles: Arc<P>) -> Self {
        let (state, _) = watch::channel(SessionState::loading());
        Self {
            identity,
            profiles,
            state,
        }
    }

    /// Cloned snapshot of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Drive the store from the provider's session-change subscription.
    ///
    /// The subscription yields the current session immediately, so the store
    /// leaves `Loading` as soon as this starts. Returns when the provider
    /// drops its notification channel. This is the single writer for
    /// notification-driven transitions; run exactly one per store.
    pub async fn run(&self) {
        let mut changes = self.identity.subscribe_session_changes();
        loop {
            let account = changes.borrow_and_update().clone();
            self.apply_session_change(account).await;
            if changes.changed().await.is_err() {
                debug!("session-change subscription closed");
                break;
            }
        }
    }

    /// Apply one session-change notification.
    ///
    /// The signed-in transition is published immediately; the profile fetch
    /// fills in afterwards and never blocks or fails the transition. A
    /// fetched profile is only applied while the session still belongs to
    /// the same account.
    pub async fn apply_session_change(&self, account: Option<AccountHandle>) {
        let Some(account) = account else {
            debug!("session change: signed out");
            self.state.send_replace(SessionState::signed_out());
            return;
        };

        debug!(account = %account.id(), "session change: signed in");
        self.state
            .send_replace(SessionState::signed_in(account.clone(), None));

        let profile = match self.profiles.get_profile(account.id()).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(account = %account.id(), "no stored profile; synthesizing fallback");
                AccountProfile::fallback_for(&account, Utc::now())
            }
            Err(error) => {
                warn!(%error, account = %account.id(), "profile fetch failed; using fallback");
                AccountProfile::fallback_for(&account, Utc::now())
            }
        };

        self.state.send_modify(|state| {
            let same_account = state
                .account
                .as_ref()
                .is_some_and(|current| current.id() == account.id());
            if same_account {
                state.profile = Some(profile);
            }
        });
    }

    /// Sign out of the provider and clear local state.
    ///
    /// Already signed out (or still loading) is a successful no-op. On
    /// provider failure the local state is left unchanged and the error is
    /// returned; the caller decides whether to retry.
    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        if self.snapshot().status() != SessionStatus::SignedIn {
            return Ok(());
        }

        self.identity.sign_out().await?;
        self.state.send_replace(SessionState::signed_out());
        Ok(())
    }

    /// Shallow-merge updated fields into the cached profile.
    ///
    /// Cannot alter the account or the session status; a no-op when no
    /// profile is cached.
    pub fn merge_profile(&self, patch: ProfilePatch) {
        self.state.send_modify(|state| {
            if let Some(profile) = state.profile.as_mut() {
                profile.apply(patch, Utc::now());
            }
        });
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
