//! Sign-in and password-reset flows.
//!
//! Both flows run a cheap client-side precheck before contacting the
//! provider, then map provider failures through the message catalogue. The
//! precheck mirrors the quick validation tier: presence plus basic shape,
//! never the full registration rule set, since existing accounts may predate the
//! current password policy.

use std::sync::Arc;

use tracing::info;
use zeroize::Zeroizing;

use crate::domain::{AccountHandle, EmailAddress, FieldName};
use crate::messages::MessageCatalog;
use crate::ports::{IdentityError, IdentityService};
use crate::validation::ValidationReport;

/// Minimum password length accepted at sign-in.
const SIGN_IN_PASSWORD_MIN: usize = 6;

/// Why a sign-in or reset request was rejected or failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// Input rejected before any provider call.
    #[error("credentials input is invalid")]
    Validation(ValidationReport),
    /// The provider rejected the request.
    #[error("{user_message}")]
    Identity {
        /// Raw provider failure.
        error: IdentityError,
        /// Catalogue-mapped message for display.
        user_message: String,
    },
}

/// Drives credential flows against the identity port.
pub struct SignInGateway<I> {
    identity: Arc<I>,
    catalog: MessageCatalog,
}

impl<I> SignInGateway<I>
where
    I: IdentityService,
{
    /// Gateway with the default message catalogue.
    pub fn new(identity: Arc<I>) -> Self {
        Self::with_catalog(identity, MessageCatalog::default())
    }

    /// Gateway with a caller-provided message catalogue.
    pub fn with_catalog(identity: Arc<I>, catalog: MessageCatalog) -> Self {
        Self { identity, catalog }
    }

    /// Validate credential shape without contacting the provider.
    pub fn precheck(email: &str, password: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        if email.trim().is_empty() {
            report.attach(FieldName::Email, "Email is required");
        } else if !EmailAddress::has_basic_shape(email) {
            report.attach(FieldName::Email, "Invalid email");
        }
        if password.is_empty() {
            report.attach(FieldName::Password, "Password is required");
        } else if password.chars().count() < SIGN_IN_PASSWORD_MIN {
            report.attach(FieldName::Password, "At least 6 characters");
        }
        report
    }

    /// Sign in with raw credential input.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AccountHandle, AuthError> {
        let report = Self::precheck(email, password);
        if !report.is_valid() {
            return Err(AuthError::Validation(report));
        }
        let email = Self::parse_email(email)?;
        let password = Zeroizing::new(password.to_owned());

        let account = self
            .identity
            .sign_in(&email, &password)
            .await
            .map_err(|error| self.identity_failure(error))?;
        info!(account = %account.id(), "sign-in succeeded");
        Ok(account)
    }

    /// Ask the provider to send a password-reset message.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let mut report = ValidationReport::new();
        if email.trim().is_empty() {
            report.attach(FieldName::Email, "Email is required");
        } else if !EmailAddress::has_basic_shape(email) {
            report.attach(FieldName::Email, "Invalid email");
        }
        if !report.is_valid() {
            return Err(AuthError::Validation(report));
        }
        let email = Self::parse_email(email)?;

        self.identity
            .send_password_reset(&email)
            .await
            .map_err(|error| self.identity_failure(error))?;
        info!(email = %email, "password-reset requested");
        Ok(())
    }

    fn parse_email(raw: &str) -> Result<EmailAddress, AuthError> {
        EmailAddress::parse(raw).map_err(|_| {
            let mut report = ValidationReport::new();
            report.attach(FieldName::Email, "Invalid email");
            AuthError::Validation(report)
        })
    }

    fn identity_failure(&self, error: IdentityError) -> AuthError {
        AuthError::Identity {
            user_message: self.catalog.user_message(&error),
            error,
        }
    }
}
