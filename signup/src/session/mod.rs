//! Session-state mirroring.
//!
//! Purpose: keep one process-local view of the identity provider's session,
//! merged with the application profile record, current for any number of
//! readers, driven by a single subscription to the provider's change
//! notifications.

mod store;

pub use store::{SessionState, SessionStatus, SessionStore};
