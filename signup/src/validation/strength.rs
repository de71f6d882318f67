//! Password-strength scoring.
//!
//! Four independent 25-point criteria summed to 0..=100. Cheap and local, so
//! it runs synchronously on every password edit with no debounce.

/// Score a password: 25 points each for length ≥ 6, an uppercase letter, a
/// digit, and a non-alphanumeric symbol.
pub fn strength_score(password: &str) -> u8 {
    let mut score = 0;
    if password.chars().count() >= 6 {
        score += 25;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 25;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 25;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 25;
    }
    score
}

/// Coarse strength bucket for progress-bar style feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthBucket {
    VeryWeak,
    Weak,
    Good,
    Excellent,
}

impl StrengthBucket {
    /// Bucket for a 0..=100 score.
    pub const fn for_score(score: u8) -> Self {
        if score < 25 {
            Self::VeryWeak
        } else if score < 50 {
            Self::Weak
        } else if score < 75 {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    /// Human-readable bucket label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}
