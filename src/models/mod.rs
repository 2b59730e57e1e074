//! Core data models for the tuition ledger.
//!
//! Records arrive from the remote store as JSON and are validated into
//! these types before any calculation touches them.

mod guardian;
mod month;
mod payment;
mod statement;
mod student;
mod tariff;

pub use guardian::{Guardian, GuardianStatus};
pub use month::{MONTH_NAMES, YearMonth};
pub use payment::{Payment, PaymentStatus, PaymentSubmission, ReviewDecision, ValidatedSubmission};
pub use statement::{
    AuditStep, AuditTrace, AuditWarning, ChildCoverage, CoverageStatus, LedgerStatement, Standing,
};
pub use student::{Level, Student, StudentCode, StudentStatus};
pub use tariff::Tariff;
