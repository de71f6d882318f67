//! Tests for the session store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::*;
use crate::domain::{AccountId, EmailAddress};
use crate::ports::{
    FixtureIdentityService, FixtureProfileStore, IdentityError, IdentityErrorKind,
    MockIdentityService, MockProfileStore, ProfileStoreError,
};

fn handle(id: &str, email: &str) -> AccountHandle {
    AccountHandle::new(
        AccountId::new(id).expect("valid id"),
        EmailAddress::parse(email).expect("valid email"),
    )
}

fn store_with(
    identity: MockIdentityService,
    profiles: MockProfileStore,
) -> SessionStore<MockIdentityService, MockProfileStore> {
    SessionStore::new(Arc::new(identity), Arc::new(profiles))
}

#[tokio::test]
async fn starts_in_the_loading_state() {
    let store = store_with(MockIdentityService::new(), MockProfileStore::new());
    let state = store.snapshot();
    assert_eq!(state.status(), SessionStatus::Loading);
    assert!(state.account().is_none());
    assert!(state.profile().is_none());
}

#[tokio::test]
async fn account_notification_applies_the_stored_profile() {
    let account = handle("uid-1", "ada@example.com");
    let mut stored = AccountProfile::fallback_for(&account, Utc::now());
    stored.display_name = "Ada Lovelace".to_owned();
    stored.role = Role::Admin;

    let mut profiles = MockProfileStore::new();
    let returned = stored.clone();
    profiles
        .expect_get_profile()
        .times(1)
        .return_once(move |_| Ok(Some(returned)));

    let store = store_with(MockIdentityService::new(), profiles);
    store.apply_session_change(Some(account.clone())).await;

    let state = store.snapshot();
    assert_eq!(state.status(), SessionStatus::SignedIn);
    assert_eq!(state.account(), Some(&account));
    assert_eq!(state.profile(), Some(&stored));
    assert!(state.is_admin());
}

#[tokio::test]
async fn profile_fetch_failure_falls_back_without_blocking_sign_in() {
    let mut profiles = MockProfileStore::new();
    profiles
        .expect_get_profile()
        .times(1)
        .return_once(|_| Err(ProfileStoreError::connection("store offline")));

    let store = store_with(MockIdentityService::new(), profiles);
    store
        .apply_session_change(Some(handle("uid-1", "ada.lovelace@example.com")))
        .await;

    let state = store.snapshot();
    assert_eq!(state.status(), SessionStatus::SignedIn);
    let profile = state.profile().expect("fallback substituted");
    assert_eq!(profile.display_name, "ada.lovelace");
    assert_eq!(profile.role, Role::Regular);
}

#[tokio::test]
async fn missing_profile_record_also_falls_back() {
    let mut profiles = MockProfileStore::new();
    profiles
        .expect_get_profile()
        .times(1)
        .return_once(|_| Ok(None));

    let store = store_with(MockIdentityService::new(), profiles);
    store
        .apply_session_change(Some(handle("uid-1", "grace@example.com")))
        .await;

    let profile = store.snapshot().profile().cloned().expect("fallback");
    assert_eq!(profile.display_name, "grace");
    assert_eq!(profile.role, Role::Regular);
}

#[tokio::test]
async fn absent_notification_clears_account_and_profile() {
    let mut profiles = MockProfileStore::new();
    profiles.expect_get_profile().return_once(|_| Ok(None));

    let store = store_with(MockIdentityService::new(), profiles);
    store
        .apply_session_change(Some(handle("uid-1", "ada@example.com")))
        .await;
    store.apply_session_change(None).await;

    let state = store.snapshot();
    assert_eq!(state.status(), SessionStatus::SignedOut);
    assert!(state.account().is_none());
    assert!(state.profile().is_none());
    assert!(!state.is_authenticated());
}

#[tokio::test]
async fn sign_out_is_idempotent_and_calls_the_provider_once() {
    let mut identity = MockIdentityService::new();
    identity.expect_sign_out().times(1).return_once(|| Ok(()));
    let mut profiles = MockProfileStore::new();
    profiles.expect_get_profile().return_once(|_| Ok(None));

    let store = store_with(identity, profiles);
    store
        .apply_session_change(Some(handle("uid-1", "ada@example.com")))
        .await;

    store.sign_out().await.expect("first sign-out succeeds");
    assert_eq!(store.snapshot().status(), SessionStatus::SignedOut);

    // Second call: already signed out, provider not contacted again.
    store.sign_out().await.expect("second sign-out is a no-op");
}

#[tokio::test]
async fn failed_sign_out_leaves_state_unchanged() {
    let mut identity = MockIdentityService::new();
    identity.expect_sign_out().times(1).return_once(|| {
        Err(IdentityError::new(
            IdentityErrorKind::Other,
            "auth/network-request-failed",
            "network error",
        ))
    });
    let mut profiles = MockProfileStore::new();
    profiles.expect_get_profile().return_once(|_| Ok(None));

    let store = store_with(identity, profiles);
    store
        .apply_session_change(Some(handle("uid-1", "ada@example.com")))
        .await;

    let err = store.sign_out().await.expect_err("provider failure surfaces");
    assert_eq!(err.kind(), IdentityErrorKind::Other);
    assert_eq!(store.snapshot().status(), SessionStatus::SignedIn);
}

#[tokio::test]
async fn merge_updates_cached_profile_fields_only() {
    let mut profiles = MockProfileStore::new();
    profiles.expect_get_profile().return_once(|_| Ok(None));

    let store = store_with(MockIdentityService::new(), profiles);
    store
        .apply_session_change(Some(handle("uid-1", "ada@example.com")))
        .await;

    store.merge_profile(ProfilePatch {
        display_name: Some("Ada Lovelace".to_owned()),
        role: Some(Role::Admin),
    });

    let state = store.snapshot();
    assert_eq!(state.status(), SessionStatus::SignedIn);
    assert_eq!(
        state.profile().map(|p| p.display_name.as_str()),
        Some("Ada Lovelace")
    );
    assert!(state.is_admin());
    assert_eq!(
        state.account().map(|a| a.id().as_str()),
        Some("uid-1"),
        "merge must not re-key the session"
    );
}

#[tokio::test]
async fn merge_is_a_no_op_without_a_cached_profile() {
    let store = store_with(MockIdentityService::new(), MockProfileStore::new());
    store.merge_profile(ProfilePatch {
        display_name: Some("Ghost".to_owned()),
        role: None,
    });

    let state = store.snapshot();
    assert_eq!(state.status(), SessionStatus::Loading);
    assert!(state.profile().is_none());
}

#[tokio::test]
async fn run_mirrors_provider_notifications() {
    let identity = Arc::new(FixtureIdentityService::new());
    let profiles = Arc::new(FixtureProfileStore::new());
    let store = Arc::new(SessionStore::new(Arc::clone(&identity), Arc::clone(&profiles)));

    let mut states = store.subscribe();
    let runner = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.run().await })
    };

    // Initial notification moves the store out of Loading.
    wait_for(&mut states, |state| {
        state.status() == SessionStatus::SignedOut
    })
    .await;

    identity
        .create_account(
            &EmailAddress::parse("ada@example.com").expect("valid email"),
            "Secret1!",
        )
        .await
        .expect("account created");

    wait_for(&mut states, |state| {
        state.status() == SessionStatus::SignedIn && state.profile().is_some()
    })
    .await;
    assert_eq!(
        store
            .snapshot()
            .profile()
            .map(|p| p.display_name.clone()),
        Some("ada".to_owned())
    );

    identity.sign_out().await.expect("sign out succeeds");
    wait_for(&mut states, |state| {
        state.status() == SessionStatus::SignedOut
    })
    .await;

    runner.abort();
}

#[tokio::test]
async fn independent_stores_do_not_share_state() {
    let identity_a = Arc::new(FixtureIdentityService::new());
    let identity_b = Arc::new(FixtureIdentityService::new());
    let profiles = Arc::new(FixtureProfileStore::new());

    let store_a = SessionStore::new(Arc::clone(&identity_a), Arc::clone(&profiles));
    let store_b = SessionStore::new(identity_b, profiles);

    store_a
        .apply_session_change(Some(handle("uid-a", "a@example.com")))
        .await;

    assert_eq!(store_a.snapshot().status(), SessionStatus::SignedIn);
    assert_eq!(store_b.snapshot().status(), SessionStatus::Loading);
}

async fn wait_for(
    states: &mut watch::Receiver<SessionState>,
    predicate: impl Fn(&SessionState) -> bool,
) {
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if predicate(&states.borrow_and_update()) {
                return;
            }
            states.changed().await.expect("store dropped");
        }
    })
    .await;
    waited.expect("expected session state within the timeout");
}
