//! Registration form validation.
//!
//! Purpose: pure rule evaluation over a [`RegistrationForm`] snapshot plus
//! the one asynchronous concern, the debounced email-availability probe.
//! Rules are split into a *quick* tier (cheap presence/shape checks for
//! per-keystroke feedback and submission pre-gating) and a *full* tier (the
//! authoritative rule set run at blur and submit time). Every quick-tier
//! failure is reproduced by the full tier.
//!
//! Validation failures are data, never `Err` at the API edge: a
//! [`ValidationReport`] maps each invalid field to a human-readable message.

use std::collections::BTreeMap;

use crate::domain::{FieldName, RegistrationForm};

pub mod availability;
mod rules;
mod strength;

pub use availability::{AvailabilityChecker, AvailabilitySnapshot, EmailAvailability};
pub use rules::{
    ValidRegistration, NAME_MAX, NAME_MIN, PASSWORD_MAX, PASSWORD_MIN, validate_full,
    validate_quick,
};
pub use strength::{StrengthBucket, strength_score};

/// Per-field validation outcome for one validation pass.
///
/// An absent key means the field is currently valid. The map is ordered by
/// on-screen field order, so the first entry is the field a UI should focus
/// after a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    field_errors: BTreeMap<FieldName, String>,
}

impl ValidationReport {
    /// Empty (all-valid) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field, keeping an earlier message if one is
    /// already present (rules short-circuit on the first failure).
    pub fn attach(&mut self, field: FieldName, message: impl Into<String>) {
        self.field_errors.entry(field).or_insert_with(|| message.into());
    }

    /// True when no field has an error.
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// Message for a field, if it failed.
    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    /// First errored field in on-screen order, for focus handling.
    pub fn first_invalid_field(&self) -> Option<FieldName> {
        self.field_errors.keys().next().copied()
    }

    /// All field errors in on-screen order.
    pub fn field_errors(&self) -> &BTreeMap<FieldName, String> {
        &self.field_errors
    }
}

/// Convenience wrapper: run the quick tier over a form snapshot.
pub fn quick_report(form: &RegistrationForm) -> ValidationReport {
    rules::validate_quick(form)
}
