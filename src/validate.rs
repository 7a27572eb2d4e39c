/// Field validation predicates.
///
/// Each field kind maps to a pure check over the raw value read from the
/// active view. Checks never short-circuit a step: the engine runs every
/// required field and reports the full failure set so the renderer can
/// highlight every problem at once.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Raw field values read from the active step's view, keyed by field id.
pub type FormValues = BTreeMap<String, String>;

/// Reason code attached to a failing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureReason {
    /// Required but blank (after trimming, for text fields).
    Empty,
    /// Present but malformed for its kind.
    Format,
    /// Does not match its paired field.
    Mismatch,
    /// Shorter than the active password policy allows.
    TooShort,
}

/// Password strength requirements, chosen per flow.
///
/// The brand ships two policies for the same "create account" concept:
/// the registration page requires mixed character classes at length 8,
/// the signup wizard only requires length 6. Callers pick one; the engine
/// never hardcodes a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum password length.
    pub min_len: usize,
    /// Require at least one uppercase letter, one lowercase letter and
    /// one digit.
    pub require_mixed_classes: bool,
}

impl PasswordPolicy {
    /// Registration-page policy: length 8 plus mixed character classes.
    pub const STRICT: PasswordPolicy = PasswordPolicy {
        min_len: 8,
        require_mixed_classes: true,
    };

    /// Signup-wizard policy: length 6, any characters.
    pub const RELAXED: PasswordPolicy = PasswordPolicy {
        min_len: 6,
        require_mixed_classes: false,
    };

    /// Check a raw password against this policy.
    pub fn check(&self, raw: &str) -> Option<FailureReason> {
        if raw.len() < self.min_len {
            return Some(FailureReason::TooShort);
        }
        if self.require_mixed_classes {
            let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
            let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
            let has_digit = raw.chars().any(|c| c.is_ascii_digit());
            if !(has_upper && has_lower && has_digit) {
                return Some(FailureReason::Format);
            }
        }
        None
    }
}

/// What a field must contain to be valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `local@domain.tld` shape.
    Email,
    /// Password checked against the given policy.
    Password(PasswordPolicy),
    /// Must be non-empty and byte-equal to the named password field.
    ConfirmPassword { pair: String },
    /// Exactly one numeric character (a single OTP slot).
    OtpDigit,
    /// Non-empty after trimming whitespace.
    RequiredText,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Check a single raw value against its field kind.
///
/// `values` supplies cross-field context: the confirm-password check reads
/// its paired field from there. Pure function, no side effects.
pub fn check_field(kind: &FieldKind, raw: &str, values: &FormValues) -> Option<FailureReason> {
    match kind {
        FieldKind::Email => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Some(FailureReason::Empty)
            } else if !email_pattern().is_match(&trimmed.to_lowercase()) {
                Some(FailureReason::Format)
            } else {
                None
            }
        }
        FieldKind::Password(policy) => {
            if raw.is_empty() {
                Some(FailureReason::Empty)
            } else {
                policy.check(raw)
            }
        }
        FieldKind::ConfirmPassword { pair } => {
            if raw.is_empty() {
                Some(FailureReason::Empty)
            } else if values.get(pair).map(String::as_str) != Some(raw) {
                Some(FailureReason::Mismatch)
            } else {
                None
            }
        }
        FieldKind::OtpDigit => {
            if raw.is_empty() {
                Some(FailureReason::Empty)
            } else if raw.len() != 1 || !raw.chars().all(|c| c.is_ascii_digit()) {
                Some(FailureReason::Format)
            } else {
                None
            }
        }
        FieldKind::RequiredText => {
            if raw.trim().is_empty() {
                Some(FailureReason::Empty)
            } else {
                None
            }
        }
    }
}

/// Result of validating one step: every failing field with its reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    failures: BTreeMap<String, FailureReason>,
}

impl ValidationResult {
    /// A result with no failures.
    pub fn passed() -> Self {
        Self::default()
    }

    /// True when no field failed.
    pub fn valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failing field ids with their reason codes.
    pub fn failures(&self) -> &BTreeMap<String, FailureReason> {
        &self.failures
    }

    pub(crate) fn record(&mut self, field_id: &str, reason: FailureReason) {
        self.failures.insert(field_id.to_string(), reason);
    }
}
