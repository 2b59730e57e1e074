//! Header alias resolution.
//!
//! Spreadsheets prepared by hand name their columns in Spanish or English,
//! with any capitalisation. Each logical column has a list of accepted
//! header names, compared after trimming and lower-casing.

use csv::StringRecord;

use crate::error::{LedgerError, LedgerResult};

/// Accepted headers for the student's full name.
pub const FULL_NAME: &[&str] = &[
    "nombre_completo",
    "nombre completo",
    "nombre",
    "full_name",
    "full name",
    "name",
];
/// Accepted headers for the level.
pub const LEVEL: &[&str] = &["nivel", "level"];
/// Accepted headers for the grade.
pub const GRADE: &[&str] = &["grado", "grade"];
/// Accepted headers for the section.
pub const SECTION: &[&str] = &["paralelo", "section"];
/// Accepted headers for the student code.
pub const CODE: &[&str] = &["codigo", "código", "code"];

/// Accepted headers for the paying guardian.
pub const GUARDIAN: &[&str] = &["apoderado_id", "guardian_id", "apoderado", "guardian", "email"];
/// Accepted headers for the target month.
pub const MONTH: &[&str] = &["mes", "month"];
/// Accepted headers for the amount.
pub const AMOUNT: &[&str] = &["monto", "amount"];
/// Accepted headers for the payment status.
pub const STATUS: &[&str] = &["estado", "status"];
/// Accepted headers for the receipt URL.
pub const PROOF: &[&str] = &["comprobante_url", "comprobante", "proof_url", "proof"];
/// Accepted headers for the upload timestamp.
pub const SUBMITTED_AT: &[&str] = &["fecha_subida", "submitted_at"];

/// Index of the first header matching any alias.
pub fn find(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim().to_lowercase();
        aliases.iter().any(|alias| *alias == header)
    })
}

/// Like [`find`], failing with `ImportError` when the column is absent.
pub fn require(headers: &StringRecord, aliases: &[&str], label: &str) -> LedgerResult<usize> {
    find(headers, aliases).ok_or_else(|| LedgerError::ImportError {
        message: format!(
            "missing required column '{}' (accepted: {})",
            label,
            aliases.join(", ")
        ),
    })
}

/// The trimmed cell at `index`, `None` when absent or blank.
pub fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
