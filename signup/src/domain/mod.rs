//! Domain primitives and aggregates.
//!
//! Purpose: define the strongly typed values shared by the validation engine,
//! the session store, and the service ports. Types validate on construction
//! and document their invariants and serde contracts in their own Rustdoc.

pub mod account;
pub mod email;
pub mod form;
pub mod profile;

pub use self::account::{AccountHandle, AccountId, AccountIdValidationError};
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::form::{FieldName, RegistrationForm, Role, UnknownRole};
pub use self::profile::{AccountProfile, ProfilePatch};
