//! Ports onto the external identity and profile services.
//!
//! The remote backend is an opaque collaborator: these traits describe the
//! exact operations the core needs from it so adapters (and tests) can
//! substitute any concrete provider. Each port exposes strongly typed errors
//! so adapters map their failures into predictable variants instead of
//! returning `anyhow::Result`.

mod identity_service;
mod profile_store;

#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::{
    FixtureIdentityService, IdentityError, IdentityErrorKind, IdentityService, SessionChanges,
};
#[cfg(test)]
pub use profile_store::MockProfileStore;
pub use profile_store::{FixtureProfileStore, ProfileStore, ProfileStoreError};
