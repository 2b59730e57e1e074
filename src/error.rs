//! Error types for the tuition ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating records,
//! computing statements, importing spreadsheets, or loading configuration.

use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    /// The name of the offending field.
    pub field: String,
    /// A human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The main error type for the tuition ledger.
///
/// # Example
///
/// ```
/// use tuition_ledger::error::LedgerError;
///
/// let error = LedgerError::TariffNotFound { year: 2026 };
/// assert_eq!(error.to_string(), "No active tariff for school year 2026");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or is inconsistent.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No active tariff exists for the requested school year.
    #[error("No active tariff for school year {year}")]
    TariffNotFound {
        /// The school year that was requested.
        year: i32,
    },

    /// A student record was invalid or inconsistent.
    #[error("Invalid student '{student}': {message}")]
    InvalidStudent {
        /// The code or id of the student.
        student: String,
        /// What made the record invalid.
        message: String,
    },

    /// A guardian record was invalid or inconsistent.
    #[error("Invalid guardian field '{field}': {message}")]
    InvalidGuardian {
        /// The field that was invalid.
        field: String,
        /// What made the field invalid.
        message: String,
    },

    /// A payment record was invalid or inconsistent.
    #[error("Invalid payment '{payment_id}': {message}")]
    InvalidPayment {
        /// The id of the payment.
        payment_id: String,
        /// What made the payment invalid.
        message: String,
    },

    /// A payment status change is not allowed from its current state.
    #[error("Payment '{payment_id}' cannot move from {from} to {to}")]
    InvalidTransition {
        /// The id of the payment.
        payment_id: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// No student carries the given lookup code.
    #[error("Student code not found: {code}")]
    StudentNotFound {
        /// The code that was looked up.
        code: String,
    },

    /// The student is already claimed by a guardian.
    #[error("Student '{code}' is already assigned to guardian {guardian_id}")]
    StudentAlreadyAssigned {
        /// The student's code.
        code: String,
        /// The guardian that owns the student.
        guardian_id: String,
    },

    /// A student code appeared more than once in the same request.
    #[error("Student code '{code}' was given more than once")]
    DuplicateCode {
        /// The repeated code.
        code: String,
    },

    /// A month tag could not be parsed.
    #[error("Invalid month '{value}': expected YYYY-MM")]
    InvalidMonth {
        /// The raw value that failed to parse.
        value: String,
    },

    /// A spreadsheet could not be imported at all.
    #[error("Import failed: {message}")]
    ImportError {
        /// A description of the failure.
        message: String,
    },

    /// Records could not be written as a spreadsheet.
    #[error("Export failed: {message}")]
    ExportError {
        /// A description of the failure.
        message: String,
    },

    /// A monetary total does not fit in a decimal.
    #[error("Amount overflow while computing {context}")]
    AmountOverflow {
        /// The total being computed.
        context: String,
    },

    /// One or more form fields failed validation.
    #[error("Validation failed: {}", format_field_errors(.errors))]
    Validation {
        /// Every field that failed.
        errors: Vec<FieldError>,
    },
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
