//! Statement result models for the tuition ledger.
//!
//! This module contains the [`LedgerStatement`] type and the structures it
//! is built from: per-child coverage, the guardian's standing, and the
//! audit trace recording every calculation step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Level, StudentCode, YearMonth};

/// How much of one child's monthly tariff the pool paid for.
///
/// # Example
///
/// ```
/// use tuition_ledger::models::CoverageStatus;
///
/// let json = serde_json::to_string(&CoverageStatus::Partial { percent: 50 }).unwrap();
/// assert_eq!(json, r#"{"status":"partial","percent":50}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoverageStatus {
    /// The full tariff was consumed.
    Covered,
    /// Some of the tariff was consumed.
    Partial {
        /// Share of the tariff paid, in whole percent.
        percent: u32,
    },
    /// Nothing was left for this child.
    Uncovered,
}

/// Coverage allocated to a single child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCoverage {
    /// The student's id.
    pub student_id: Uuid,
    /// The student's lookup code.
    pub code: StudentCode,
    /// The student's full name.
    pub full_name: String,
    /// The student's level.
    pub level: Level,
    /// The monthly tariff for the student's level.
    pub tariff: Decimal,
    /// The part of the pool consumed by this child.
    pub allocated: Decimal,
    /// Resulting coverage.
    pub coverage: CoverageStatus,
}

/// Overall payment standing of a guardian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    /// Payments cover every elapsed month. Always the case outside the
    /// school year.
    Current,
    /// At least one elapsed month is unpaid.
    InArrears,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Identifier of the rule that was applied.
    pub rule_id: String,
    /// Human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag data that looks wrong without stopping the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (`low`, `medium`, `high`).
    pub severity: String,
}

/// The complete audit trace for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// A guardian's tuition position for one school year.
///
/// `balance` is the annual obligation minus everything paid; a negative
/// balance is credit. When `in_session` is false `arrears` is always empty
/// and `advance_credit` holds what was paid toward the upcoming window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStatement {
    /// The guardian this statement is for.
    pub guardian_id: Uuid,
    /// The school year the window belongs to.
    pub school_year: i32,
    /// The date the statement was computed for.
    pub as_of: NaiveDate,
    /// Whether `as_of` falls inside the school-year window.
    pub in_session: bool,
    /// Sum of every child's tariff.
    pub monthly_obligation: Decimal,
    /// Monthly obligation times the window length.
    pub annual_obligation: Decimal,
    /// Approved payments tagged inside the window.
    pub total_paid: Decimal,
    /// Annual obligation minus total paid.
    pub balance: Decimal,
    /// Total paid divided by monthly obligation.
    pub months_covered: Decimal,
    /// `months_covered` rounded down.
    pub whole_months_covered: u32,
    /// Window months whose first day is before `as_of`.
    pub elapsed_months: u32,
    /// How the pool was spread over the children.
    pub children: Vec<ChildCoverage>,
    /// Elapsed months the paid amount does not reach, earliest first.
    pub arrears: Vec<YearMonth>,
    /// Elapsed months with no approved payment tagged for them.
    pub overdue_months: Vec<YearMonth>,
    /// Overall standing.
    pub standing: Standing,
    /// Amount paid ahead for the upcoming window while out of session.
    pub advance_credit: Decimal,
    /// Every decision taken while computing the statement.
    pub audit_trace: AuditTrace,
}

impl LedgerStatement {
    /// Returns true if any elapsed month is short of payment.
    pub fn has_arrears(&self) -> bool {
        self.standing == Standing::InArrears
    }
}
