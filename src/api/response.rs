//! Response types for the tuition ledger API.
//!
//! This module defines the error response structures and the mapping from
//! [`LedgerError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::error::{FieldError, LedgerError};
use crate::models::{Student, StudentCode};

/// Response body for `/registration/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// Id to create the guardian record with.
    pub guardian_id: Uuid,
    /// The login to create with the authentication provider.
    pub login_email: String,
    /// Which dashboard the account opens.
    pub role: Role,
    /// The normalised codes from the form.
    pub codes: Vec<StudentCode>,
    /// Roster students now assigned to the guardian.
    pub claimed: Vec<Student>,
}

/// Response body for `/roster/release`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// The student, now available.
    pub student: Student,
    /// Who the student belonged to, if anyone.
    pub previous_guardian_id: Option<Uuid>,
}

/// Response body for `/roster/code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeResponse {
    /// A code not yet on the roster.
    pub code: StudentCode,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Every field that failed validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            fields: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response listing the failing fields.
    pub fn validation_error(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            fields,
            ..Self::new("VALIDATION_ERROR", message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            LedgerError::ConfigNotFound { path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            LedgerError::ConfigParseError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            LedgerError::TariffNotFound { year } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "TARIFF_NOT_FOUND",
                    message,
                    format!("Configure an active tariff for {} before computing statements", year),
                ),
            ),
            LedgerError::InvalidStudent { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_STUDENT",
                    message,
                    "The student data contains invalid information",
                ),
            ),
            LedgerError::InvalidGuardian { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_GUARDIAN",
                    message,
                    "The guardian data contains invalid information",
                ),
            ),
            LedgerError::InvalidPayment { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PAYMENT",
                    message,
                    "The payment data contains invalid information",
                ),
            ),
            LedgerError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "INVALID_TRANSITION",
                    message,
                    "Only pending payments can be reviewed",
                ),
            ),
            LedgerError::StudentNotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("STUDENT_NOT_FOUND", message))
            }
            LedgerError::StudentAlreadyAssigned { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("STUDENT_ALREADY_ASSIGNED", message),
            ),
            LedgerError::DuplicateCode { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("DUPLICATE_CODE", message))
            }
            LedgerError::InvalidMonth { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_MONTH", message))
            }
            LedgerError::ImportError { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("IMPORT_ERROR", message))
            }
            LedgerError::ExportError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            ),
            LedgerError::AmountOverflow { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("AMOUNT_OVERFLOW", message),
            ),
            LedgerError::Validation { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::validation_error(message, errors),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
