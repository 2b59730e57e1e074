//! Spreadsheet import and export.
//!
//! Students and payments travel as CSV. Headers are matched against
//! Spanish and English aliases; a bad row is reported and skipped while
//! the rest of the file is imported.

pub mod columns;
mod export;
mod payments;
mod students;

use serde::{Deserialize, Serialize};

pub use export::{
    PAYMENT_HEADERS, STUDENT_HEADERS, export_payments, export_students, payments_to_csv,
    students_to_csv,
};
pub use payments::import_payments;
pub use students::import_students;

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Spreadsheet row number; the header is row 1.
    pub row: usize,
    /// What was wrong with the row.
    pub message: String,
}

impl RowError {
    /// Creates a row error.
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport<T> {
    /// Records read successfully.
    pub imported: Vec<T>,
    /// Rows that were skipped.
    pub errors: Vec<RowError>,
}

impl<T> Default for ImportReport<T> {
    fn default() -> Self {
        Self {
            imported: Vec::new(),
            errors: Vec::new(),
        }
    }
}
