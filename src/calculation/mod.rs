//! Calculation logic for the tuition ledger.
//!
//! This module contains the tuition ledger calculator: school-year window
//! resolution, monthly obligation, months covered, per-child coverage
//! allocation, arrears detection, the guardian statement that combines
//! them, and the administrator dashboard and guardian list.
//!
//! Every function here is a pure function of its inputs.

mod arrears;
mod coverage;
mod dashboard;
mod guardians;
mod obligation;
mod school_window;
mod statement;

pub use arrears::{
    ArrearsList, OverdueGuardian, list_overdue_guardians, overdue_months, shortfall_months,
    unpaid_months_before,
};
pub use coverage::allocate_coverage;
pub use dashboard::{DashboardSummary, StudentCounts, summarize_dashboard};
pub use guardians::{GuardianRow, list_guardians};
pub use obligation::{
    MONTHS_COVERED_SCALE, checked_total, monthly_obligation, months_covered, total_paid,
    whole_months,
};
pub use school_window::{SchoolWindow, WindowPosition};
pub use statement::calculate_statement;
