//! Registration submission gate.
//!
//! Submission runs the quick tier first (so plainly incomplete input never
//! reaches the provider), then the full tier as the authoritative gate, then
//! the uniqueness verdict, and only then the provider call. The availability
//! verdict blocks only on a definite `Taken`; `Unknown` and `Checking` fail
//! open; the provider enforces uniqueness authoritatively anyway.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{AccountHandle, AccountProfile, FieldName, RegistrationForm};
use crate::messages::MessageCatalog;
use crate::ports::{
    IdentityError, IdentityErrorKind, IdentityService, ProfileStore, ProfileStoreError,
};
use crate::validation::{EmailAvailability, ValidationReport, validate_full, validate_quick};

/// Why a submission was rejected or failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// Input rejected before any provider call. Carries every field error at
    /// once; the first entry (screen order) is the field to focus.
    #[error("registration input is invalid")]
    Validation(ValidationReport),
    /// The provider rejected the account creation.
    #[error("{user_message}")]
    Identity {
        /// Raw provider failure.
        error: IdentityError,
        /// Catalogue-mapped message for display.
        user_message: String,
        /// Owning form field, when the failure is field-attributable.
        field: Option<FieldName>,
    },
    /// The account exists but the initial profile write failed; the caller
    /// may retry the write with the returned handle.
    #[error("profile write failed for new account: {error}")]
    ProfileWrite {
        /// Account the provider issued before the write failed.
        account: AccountHandle,
        /// Underlying store failure.
        error: ProfileStoreError,
    },
}

/// Drives a registration submission against the identity and profile ports.
pub struct RegistrationService<I, P> {
    identity: Arc<I>,
    profiles: Arc<P>,
    catalog: MessageCatalog,
}

impl<I, P> RegistrationService<I, P>
where
    I: IdentityService,
    P: ProfileStore,
{
    /// Service with the default message catalogue.
    pub fn new(identity: Arc<I>, profiles: Arc<P>) -> Self {
        Self::with_catalog(identity, profiles, MessageCatalog::default())
    }

    /// Service with a caller-provided message catalogue.
    pub fn with_catalog(identity: Arc<I>, profiles: Arc<P>, catalog: MessageCatalog) -> Self {
        Self {
            identity,
            profiles,
            catalog,
        }
    }

    /// Submit a registration form.
    ///
    /// `availability` is the current email-availability verdict from the
    /// caller's [`AvailabilityChecker`](crate::validation::AvailabilityChecker).
    /// On success the account exists, a session is established by the
    /// provider, and the initial profile record has been written.
    pub async fn submit(
        &self,
        form: &RegistrationForm,
        availability: EmailAvailability,
    ) -> Result<AccountProfile, SubmitError> {
        let quick = validate_quick(form);
        if !quick.is_valid() {
            return Err(SubmitError::Validation(quick));
        }

        let valid = validate_full(form).map_err(SubmitError::Validation)?;

        if availability == EmailAvailability::Taken {
            let mut report = ValidationReport::new();
            report.attach(FieldName::Email, "This email is already registered");
            return Err(SubmitError::Validation(report));
        }

        let account = self
            .identity
            .create_account(&valid.email, &valid.password)
            .await
            .map_err(|error| self.identity_failure(error))?;

        let profile = AccountProfile::new_registration(
            account.id().clone(),
            valid.name,
            valid.email,
            valid.role,
            Utc::now(),
        );
        self.profiles
            .set_profile(&profile)
            .await
            .map_err(|error| SubmitError::ProfileWrite {
                account: account.clone(),
                error,
            })?;

        info!(account = %profile.account_id, role = %profile.role, "registration completed");
        Ok(profile)
    }

    fn identity_failure(&self, error: IdentityError) -> SubmitError {
        let field = match error.kind() {
            IdentityErrorKind::EmailInUse | IdentityErrorKind::InvalidEmail => {
                Some(FieldName::Email)
            }
            IdentityErrorKind::WeakPassword => Some(FieldName::Password),
            _ => None,
        };
        SubmitError::Identity {
            user_message: self.catalog.user_message(&error),
            error,
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{AccountId, EmailAddress, Role};
    use crate::ports::{
        FixtureIdentityService, FixtureProfileStore, MockIdentityService, MockProfileStore,
    };
    use rstest::rstest;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Ada Lovelace".to_owned(),
            email: "Ada@Example.com".to_owned(),
            password: "Secret1!".to_owned(),
            confirm_password: "Secret1!".to_owned(),
            role: Some(Role::Admin),
        }
    }

    fn mock_service(
        identity: MockIdentityService,
        profiles: MockProfileStore,
    ) -> RegistrationService<MockIdentityService, MockProfileStore> {
        RegistrationService::new(Arc::new(identity), Arc::new(profiles))
    }

    #[tokio::test]
    async fn quick_invalid_input_never_reaches_the_provider() {
        // No expectations set: any provider call would panic the mock.
        let service = mock_service(MockIdentityService::new(), MockProfileStore::new());
        let mut form = valid_form();
        form.name = String::new();

        let err = service
            .submit(&form, EmailAvailability::Unknown)
            .await
            .expect_err("quick tier rejects");
        match err {
            SubmitError::Validation(report) => {
                assert_eq!(report.first_invalid_field(), Some(FieldName::Name));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn taken_verdict_blocks_before_the_provider() {
        let service = mock_service(MockIdentityService::new(), MockProfileStore::new());
        let err = service
            .submit(&valid_form(), EmailAvailability::Taken)
            .await
            .expect_err("taken email rejects");
        match err {
            SubmitError::Validation(report) => {
                assert_eq!(
                    report.error(FieldName::Email),
                    Some("This email is already registered")
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[rstest]
    #[case(EmailAvailability::Unknown)]
    #[case(EmailAvailability::Checking)]
    #[case(EmailAvailability::Available)]
    #[tokio::test]
    async fn indeterminate_availability_fails_open(#[case] availability: EmailAvailability) {
        let identity = Arc::new(FixtureIdentityService::new());
        let profiles = Arc::new(FixtureProfileStore::new());
        let service = RegistrationService::new(Arc::clone(&identity), Arc::clone(&profiles));

        let profile = service
            .submit(&valid_form(), availability)
            .await
            .expect("submission succeeds");
        assert_eq!(profile.email.as_str(), "ada@example.com");
    }

    #[tokio::test]
    async fn success_writes_a_normalised_profile_and_signs_in() {
        let identity = Arc::new(FixtureIdentityService::new());
        let profiles = Arc::new(FixtureProfileStore::new());
        let service = RegistrationService::new(Arc::clone(&identity), Arc::clone(&profiles));

        let mut form = valid_form();
        form.name = "  Ada Lovelace  ".to_owned();
        let profile = service
            .submit(&form, EmailAvailability::Available)
            .await
            .expect("submission succeeds");

        assert_eq!(profile.display_name, "Ada Lovelace");
        assert_eq!(profile.email.as_str(), "ada@example.com");
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.created_at, profile.updated_at);

        let stored = profiles
            .get_profile(&profile.account_id)
            .await
            .expect("read succeeds");
        assert_eq!(stored, Some(profile.clone()));
        assert_eq!(
            identity.current_session().map(|h| h.id().clone()),
            Some(profile.account_id)
        );
    }

    #[tokio::test]
    async fn provider_email_in_use_is_attributed_to_the_email_field() {
        let mut identity = MockIdentityService::new();
        identity
            .expect_create_account()
            .times(1)
            .return_once(|_, _| {
                Err(IdentityError::new(
                    IdentityErrorKind::EmailInUse,
                    "auth/email-already-in-use",
                    "the email address is already in use by another account",
                ))
            });

        let service = mock_service(identity, MockProfileStore::new());
        let err = service
            .submit(&valid_form(), EmailAvailability::Unknown)
            .await
            .expect_err("provider rejects");
        match err {
            SubmitError::Identity {
                user_message,
                field,
                ..
            } => {
                assert_eq!(user_message, "This email is already registered");
                assert_eq!(field, Some(FieldName::Email));
            }
            other => panic!("expected identity failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unmapped_provider_failures_keep_the_raw_message() {
        let mut identity = MockIdentityService::new();
        identity
            .expect_create_account()
            .times(1)
            .return_once(|_, _| {
                Err(IdentityError::other(
                    "auth/internal-error",
                    "An internal AuthError has occurred",
                ))
            });

        let service = mock_service(identity, MockProfileStore::new());
        let err = service
            .submit(&valid_form(), EmailAvailability::Available)
            .await
            .expect_err("provider rejects");
        match err {
            SubmitError::Identity {
                user_message,
                field,
                ..
            } => {
                assert_eq!(user_message, "An internal AuthError has occurred");
                assert_eq!(field, None);
            }
            other => panic!("expected identity failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_profile_write_returns_the_issued_account() {
        let handle = AccountHandle::new(
            AccountId::new("uid-1").expect("valid id"),
            EmailAddress::parse("ada@example.com").expect("valid email"),
        );
        let mut identity = MockIdentityService::new();
        let issued = handle.clone();
        identity
            .expect_create_account()
            .times(1)
            .return_once(move |_, _| Ok(issued));
        let mut profiles = MockProfileStore::new();
        profiles
            .expect_set_profile()
            .times(1)
            .return_once(|_| Err(ProfileStoreError::query("permission denied")));

        let service = mock_service(identity, profiles);
        let err = service
            .submit(&valid_form(), EmailAvailability::Available)
            .await
            .expect_err("write fails");
        match err {
            SubmitError::ProfileWrite { account, error } => {
                assert_eq!(account, handle);
                assert_eq!(error, ProfileStoreError::query("permission denied"));
            }
            other => panic!("expected profile-write failure, got {other:?}"),
        }
    }
}
