//! CSV export with canonical headers.

use std::io::Write;

use csv::Writer;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Payment, Student, StudentStatus};

/// Headers written by [`export_students`].
pub const STUDENT_HEADERS: [&str; 7] = [
    "code",
    "full_name",
    "level",
    "grade",
    "section",
    "status",
    "guardian_id",
];

/// Headers written by [`export_payments`].
pub const PAYMENT_HEADERS: [&str; 8] = [
    "id",
    "guardian_id",
    "month",
    "amount",
    "status",
    "proof_url",
    "submitted_at",
    "review_note",
];

fn export_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::ExportError {
        message: e.to_string(),
    }
}

/// Writes `students` as CSV.
pub fn export_students<W: Write>(writer: W, students: &[Student]) -> LedgerResult<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(STUDENT_HEADERS).map_err(export_error)?;
    for student in students {
        let status = match student.status() {
            StudentStatus::Available => "available",
            StudentStatus::Assigned => "assigned",
        };
        let guardian = student
            .guardian_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        csv.write_record([
            student.code.as_str(),
            student.full_name.as_str(),
            student.level.label(),
            student.grade.as_deref().unwrap_or_default(),
            student.section.as_deref().unwrap_or_default(),
            status,
            guardian.as_str(),
        ])
        .map_err(export_error)?;
    }
    csv.flush().map_err(export_error)
}

/// Writes `payments` as CSV.
pub fn export_payments<W: Write>(writer: W, payments: &[Payment]) -> LedgerResult<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(PAYMENT_HEADERS).map_err(export_error)?;
    for payment in payments {
        csv.write_record([
            payment.id.to_string(),
            payment.guardian_id.to_string(),
            payment.month.to_string(),
            payment.amount.to_string(),
            payment.status.to_string(),
            payment.proof_url.clone(),
            payment.submitted_at.to_rfc3339(),
            payment.review_note.clone().unwrap_or_default(),
        ])
        .map_err(export_error)?;
    }
    csv.flush().map_err(export_error)
}

/// [`export_students`] into a `String`.
pub fn students_to_csv(students: &[Student]) -> LedgerResult<String> {
    let mut buffer = Vec::new();
    export_students(&mut buffer, students)?;
    String::from_utf8(buffer).map_err(export_error)
}

/// [`export_payments`] into a `String`.
pub fn payments_to_csv(payments: &[Payment]) -> LedgerResult<String> {
    let mut buffer = Vec::new();
    export_payments(&mut buffer, payments)?;
    String::from_utf8(buffer).map_err(export_error)
}
