//! Provider error-message catalogue.
//!
//! User-facing wording for identity-provider failures lives in one mapping
//! table passed as configuration, so the core stays decoupled from any
//! specific provider's error vocabulary. Codes without an entry fall back to
//! the provider's raw message, so nothing is swallowed.

use std::collections::HashMap;

use crate::ports::IdentityError;

/// Mapping from provider error codes to user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Empty catalogue: every failure falls back to the provider's raw
    /// message.
    pub fn empty() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    /// Register (or replace) the message for a provider code.
    #[must_use]
    pub fn with_message(mut self, provider_code: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(provider_code.into(), message.into());
        self
    }

    /// User-facing message for a failure.
    ///
    /// Unmapped codes use the provider's raw message verbatim; that is the
    /// documented default, chosen over a generic "something went wrong" so
    /// no diagnostic detail is lost at this tier.
    pub fn user_message(&self, error: &IdentityError) -> String {
        self.messages
            .get(error.provider_code())
            .cloned()
            .unwrap_or_else(|| error.message().to_owned())
    }
}

impl Default for MessageCatalog {
    /// Catalogue covering the provider codes the flows are written against.
    fn default() -> Self {
        Self::empty()
            .with_message("auth/email-already-in-use", "This email is already registered")
            .with_message("auth/invalid-email", "Invalid email")
            .with_message("auth/weak-password", "Password is too weak")
            .with_message("auth/user-not-found", "No account found with this email")
            .with_message("auth/wrong-password", "Incorrect password")
            .with_message("auth/too-many-requests", "Too many attempts. Try again later")
            .with_message("auth/user-disabled", "This account has been disabled")
    }
}
