//! Registration and session-synchronisation core for an account sign-up flow.
//!
//! This crate validates registration input, checks email availability with a
//! debounce against the profile store, submits accepted registrations to an
//! identity provider, and mirrors the provider's session into an observable
//! store that callers can watch.
//!
//! # Overview
//!
//! The crate is split along hexagonal lines:
//!
//! - [`domain`]: validated value types ([`EmailAddress`], [`AccountProfile`])
//! - [`ports`]: provider traits ([`IdentityService`], [`ProfileStore`]) with
//!   in-memory fixture adapters
//! - [`validation`]: the two-tier rule engine, strength meter, and debounced
//!   availability checker
//! - [`registration`] and [`auth`]: the submit and sign-in flows
//! - [`session`]: the watchable session mirror
//!
//! # Example
//!
//! ```
//! use signup::domain::RegistrationForm;
//! use signup::validation::validate_full;
//!
//! let form = RegistrationForm {
//!     name: "Ada Lovelace".into(),
//!     email: "Ada@Example.com".into(),
//!     password: "Secret1!".into(),
//!     confirm_password: "Secret1!".into(),
//!     ..RegistrationForm::default()
//! };
//!
//! let valid = validate_full(&form).expect("form passes every rule");
//! assert_eq!(valid.email.as_str(), "ada@example.com");
//! ```

pub mod auth;
pub mod domain;
pub mod messages;
pub mod ports;
pub mod registration;
pub mod session;
pub mod validation;

pub use auth::{AuthError, SignInGateway};
pub use domain::{AccountHandle, AccountId, AccountProfile, EmailAddress, RegistrationForm, Role};
pub use messages::MessageCatalog;
pub use ports::{IdentityService, ProfileStore};
pub use registration::{RegistrationService, SubmitError};
pub use session::{SessionState, SessionStatus, SessionStore};
pub use validation::{EmailAvailability, ValidationReport};
