//! Field and form validation.
//!
//! Every check here runs before any remote call is attempted. Single-field
//! predicates return `bool`; form validators collect every failing field
//! into a [`LedgerError::Validation`] so the caller can report them inline
//! all at once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::UploadLimits;
use crate::error::{FieldError, LedgerError, LedgerResult};
use crate::models::{StudentCode, Tariff};

/// Minimum length of an account password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum length of a person's full name.
pub const MIN_NAME_LEN: usize = 3;

const ACCENTED_LETTERS: &str = "áéíóúÁÉÍÓÚñÑ";

/// Returns true if `phone` is exactly eight ASCII digits.
///
/// ```
/// use tuition_ledger::validation::is_valid_phone;
///
/// assert!(is_valid_phone("71234567"));
/// assert!(!is_valid_phone("7123456"));
/// assert!(!is_valid_phone("7123-4567"));
/// ```
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 8 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if `email` is empty or looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() {
        return true;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Returns true if `name` has at least three characters and contains only
/// letters (including Spanish accents and ñ) and spaces.
pub fn is_valid_full_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.chars().count() >= MIN_NAME_LEN
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || ACCENTED_LETTERS.contains(c))
}

/// Largest amount a single payment may carry.
pub const MAX_PAYMENT_AMOUNT: i64 = 1_000_000;

/// Message reported for an amount outside `(0, MAX_PAYMENT_AMOUNT]`.
pub const AMOUNT_RANGE_MESSAGE: &str = "amount must be greater than zero and at most 1000000";

/// Returns true if `amount` is strictly positive and at most
/// [`MAX_PAYMENT_AMOUNT`].
///
/// ```
/// use rust_decimal::Decimal;
/// use tuition_ledger::validation::is_valid_amount;
///
/// assert!(is_valid_amount(Decimal::new(35000, 2)));
/// assert!(!is_valid_amount(Decimal::ZERO));
/// assert!(!is_valid_amount(Decimal::new(1_000_001, 0)));
/// ```
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount <= Decimal::from(MAX_PAYMENT_AMOUNT)
}

/// Metadata of a proof-of-payment image before it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofUpload {
    /// MIME type reported by the client, e.g. `image/png`.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Checks a proof upload against the configured limits.
pub fn validate_proof(proof: &ProofUpload, limits: &UploadLimits) -> Result<(), FieldError> {
    let content_type = proof.content_type.trim().to_ascii_lowercase();
    if !limits
        .allowed_proof_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&content_type))
    {
        return Err(FieldError::new(
            "proof",
            "only JPG, PNG or GIF images are accepted",
        ));
    }
    if proof.size_bytes > limits.max_proof_bytes {
        return Err(FieldError::new(
            "proof",
            format!(
                "image must not exceed {} MB",
                limits.max_proof_bytes / (1024 * 1024)
            ),
        ));
    }
    Ok(())
}

/// Checks that both rates of a tariff update are strictly positive.
pub fn validate_tariff(tariff: &Tariff) -> LedgerResult<()> {
    let mut errors = Vec::new();
    if tariff.primary <= Decimal::ZERO {
        errors.push(FieldError::new("primary", "rate must be greater than zero"));
    }
    if tariff.secondary <= Decimal::ZERO {
        errors.push(FieldError::new("secondary", "rate must be greater than zero"));
    }
    into_result(errors)
}

/// A guardian sign-up form as submitted by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    /// The guardian's full name.
    pub full_name: String,
    /// An eight digit phone number, also used as login.
    pub phone: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Chosen password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Student codes the guardian wants to claim.
    #[serde(default)]
    pub codes: Vec<String>,
}

impl RegistrationForm {
    /// Validates every field and returns the normalised student codes.
    ///
    /// All failing fields are reported together.
    ///
    /// ```
    /// use tuition_ledger::validation::RegistrationForm;
    ///
    /// let form = RegistrationForm {
    ///     full_name: "María Pérez".to_string(),
    ///     phone: "71234567".to_string(),
    ///     email: None,
    ///     password: "secreto".to_string(),
    ///     confirm_password: "secreto".to_string(),
    ///     codes: vec!["a3b7".to_string()],
    /// };
    /// let codes = form.validate().unwrap();
    /// assert_eq!(codes[0].as_str(), "A3B7");
    /// ```
    pub fn validate(&self) -> LedgerResult<Vec<StudentCode>> {
        let mut errors = Vec::new();

        if !is_valid_full_name(&self.full_name) {
            errors.push(FieldError::new(
                "full_name",
                "name must have at least 3 letters and only letters and spaces",
            ));
        }
        if !is_valid_phone(self.phone.trim()) {
            errors.push(FieldError::new("phone", "phone must be 8 digits"));
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email.trim()) {
                errors.push(FieldError::new("email", "invalid email address"));
            }
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("password must have at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if self.password != self.confirm_password {
            errors.push(FieldError::new("confirm_password", "passwords do not match"));
        }

        let mut codes: Vec<StudentCode> = Vec::new();
        for raw in &self.codes {
            match raw.parse::<StudentCode>() {
                Ok(code) if codes.contains(&code) => errors.push(FieldError::new(
                    "codes",
                    format!("code {} was already added", code),
                )),
                Ok(code) => codes.push(code),
                Err(_) => errors.push(FieldError::new(
                    "codes",
                    format!("'{}' must be 4 letters or digits", raw.trim()),
                )),
            }
        }
        if self.codes.is_empty() {
            errors.push(FieldError::new(
                "codes",
                "at least one student code is required",
            ));
        }

        into_result(errors)?;
        Ok(codes)
    }
}

pub(crate) fn into_result(errors: Vec<FieldError>) -> LedgerResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation { errors })
    }
}
