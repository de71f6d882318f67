//! Field-level and cross-field registration rules.
//!
//! All rules for a field short-circuit on the first failure in priority
//! order. The cross-field confirm rule only fires once both password fields
//! are individually valid, so a mismatch never stacks on top of a
//! composition error.

use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, EmailValidationError, FieldName, RegistrationForm, Role};

use super::ValidationReport;

/// Minimum allowed name length (after trimming).
pub const NAME_MIN: usize = 2;
/// Maximum allowed name length (after trimming).
pub const NAME_MAX: usize = 50;
/// Minimum allowed password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum allowed password length.
pub const PASSWORD_MAX: usize = 50;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // Length is enforced separately; this constrains allowed characters
        // to letters in any script plus whitespace.
        let pattern = r"^[\p{L}\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

/// Normalised registration values produced by a passing full validation.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    /// Trimmed display name.
    pub name: String,
    /// Canonical (lowercased, trimmed) email.
    pub email: EmailAddress,
    /// Password exactly as typed; zeroed on drop.
    pub password: Zeroizing<String>,
    /// Selected role.
    pub role: Role,
}

/// Quick tier: presence and basic shape only.
///
/// Cheap enough to run on every keystroke; also pre-gates submission so a
/// plainly incomplete form never reaches the full tier or the provider.
pub fn validate_quick(form: &RegistrationForm) -> ValidationReport {
    let mut report = ValidationReport::new();

    if form.name.trim().is_empty() {
        report.attach(FieldName::Name, "Name is required");
    }
    if !EmailAddress::has_basic_shape(&form.email) {
        report.attach(FieldName::Email, "Invalid email");
    }
    if form.password.chars().count() < PASSWORD_MIN {
        report.attach(FieldName::Password, "At least 6 characters");
    }
    if form.confirm_password.is_empty() {
        report.attach(FieldName::ConfirmPassword, "Confirm your password");
    }
    if form.role.is_none() {
        report.attach(FieldName::Role, "Select a valid role");
    }

    report
}

/// Full tier: the authoritative rule set.
///
/// A strict superset of the quick tier. On success returns the normalised
/// values a submission should use; on failure returns every field error at
/// once so a UI can surface them simultaneously.
pub fn validate_full(form: &RegistrationForm) -> Result<ValidRegistration, ValidationReport> {
    let mut report = ValidationReport::new();

    let name = validate_name(&form.name, &mut report);
    let email = validate_email(&form.email, &mut report);
    let password_ok = validate_password(&form.password, &mut report);
    validate_confirmation(form, password_ok, &mut report);

    let role = form.role;
    if role.is_none() {
        report.attach(FieldName::Role, "Select a valid role");
    }

    match (report.is_valid(), name, email, role) {
        (true, Some(name), Some(email), Some(role)) => Ok(ValidRegistration {
            name,
            email,
            password: Zeroizing::new(form.password.clone()),
            role,
        }),
        _ => Err(report),
    }
}

fn validate_name(raw: &str, report: &mut ValidationReport) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        report.attach(FieldName::Name, "Name is required");
        return None;
    }

    let length = trimmed.chars().count();
    if length < NAME_MIN {
        report.attach(FieldName::Name, "At least 2 characters");
        return None;
    }
    if length > NAME_MAX {
        report.attach(FieldName::Name, "At most 50 characters");
        return None;
    }
    if !name_regex().is_match(trimmed) {
        report.attach(FieldName::Name, "Letters and spaces only");
        return None;
    }

    Some(trimmed.to_owned())
}

fn validate_email(raw: &str, report: &mut ValidationReport) -> Option<EmailAddress> {
    match EmailAddress::parse(raw) {
        Ok(email) => Some(email),
        Err(EmailValidationError::Empty) => {
            report.attach(FieldName::Email, "Email is required");
            None
        }
        Err(EmailValidationError::Invalid) => {
            report.attach(FieldName::Email, "Invalid email format");
            None
        }
    }
}

fn validate_password(raw: &str, report: &mut ValidationReport) -> bool {
    if raw.is_empty() {
        report.attach(FieldName::Password, "Password is required");
        return false;
    }

    let length = raw.chars().count();
    if length < PASSWORD_MIN {
        report.attach(FieldName::Password, "At least 6 characters");
        return false;
    }
    if length > PASSWORD_MAX {
        report.attach(FieldName::Password, "At most 50 characters");
        return false;
    }
    if !raw.chars().any(|c| c.is_ascii_uppercase()) {
        report.attach(FieldName::Password, "At least one uppercase letter (A-Z)");
        return false;
    }
    if !raw.chars().any(|c| c.is_ascii_lowercase()) {
        report.attach(FieldName::Password, "At least one lowercase letter (a-z)");
        return false;
    }
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        report.attach(FieldName::Password, "At least one digit (0-9)");
        return false;
    }
    if !raw.chars().any(|c| !c.is_ascii_alphanumeric()) {
        report.attach(
            FieldName::Password,
            "At least one special character (!@#$%^&*)",
        );
        return false;
    }

    true
}

fn validate_confirmation(form: &RegistrationForm, password_ok: bool, report: &mut ValidationReport) {
    if form.confirm_password.is_empty() {
        report.attach(FieldName::ConfirmPassword, "Confirm your password");
        return;
    }
    // The mismatch rule only applies once both fields are individually valid.
    if password_ok && form.password != form.confirm_password {
        report.attach(FieldName::ConfirmPassword, "Passwords do not match");
    }
}
