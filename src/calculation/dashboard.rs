//! Administrator dashboard aggregation.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::SchoolCalendar;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Guardian, Level, Payment, PaymentStatus, Student, Tariff, YearMonth};

use super::{checked_total, monthly_obligation, total_paid, unpaid_months_before};

/// Student head counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentCounts {
    /// Every enrolled student.
    pub total: usize,
    /// Students in primary.
    pub primary: usize,
    /// Students in secondary.
    pub secondary: usize,
    /// Students claimed by a guardian.
    pub assigned: usize,
    /// Students not yet claimed.
    pub available: usize,
}

impl StudentCounts {
    /// Counts `students` by level and assignment.
    pub fn from_students(students: &[Student]) -> Self {
        let mut counts = Self {
            total: students.len(),
            ..Self::default()
        };
        for student in students {
            match student.level {
                Level::Primary => counts.primary += 1,
                Level::Secondary => counts.secondary += 1,
            }
            if student.guardian_id.is_some() {
                counts.assigned += 1;
            } else {
                counts.available += 1;
            }
        }
        counts
    }
}

/// Collection figures shown on the administrator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The date evaluated.
    pub as_of: NaiveDate,
    /// The calendar month containing `as_of`.
    pub current_month: YearMonth,
    /// The school year the figures refer to.
    pub school_year: i32,
    /// Whether `as_of` is inside the school year.
    pub in_session: bool,
    /// Approved payments tagged with the current month.
    pub collected_this_month: Decimal,
    /// Approved payments tagged inside the window.
    pub collected_this_year: Decimal,
    /// Active guardians' monthly obligation times the window length.
    pub annual_goal: Decimal,
    /// Collected this year over the goal, in percent with one decimal.
    pub compliance_rate: Decimal,
    /// Active guardians missing a payment for a window month before this one.
    pub guardians_in_arrears: usize,
    /// Active guardians without an approved payment for the current month.
    pub pending_this_month: usize,
    /// Guardians with an active account.
    pub active_guardians: usize,
    /// Payments awaiting review.
    pub pending_reviews: usize,
    /// Student head counts.
    pub students: StudentCounts,
}

/// Aggregates the dashboard figures as of `today`.
///
/// Arrears and the current month's pending count are only evaluated in
/// session; outside it both are zero. Totals that leave the decimal range
/// fail with [`LedgerError::AmountOverflow`].
pub fn summarize_dashboard(
    guardians: &[Guardian],
    students: &[Student],
    payments: &[Payment],
    tariff: &Tariff,
    calendar: &SchoolCalendar,
    today: NaiveDate,
) -> LedgerResult<DashboardSummary> {
    let position = calendar.position(today);
    let window = position.window();
    let in_session = position.is_in_session();
    let current_month = YearMonth::from_date(today);

    let collected_this_month = checked_total(
        payments
            .iter()
            .filter(|p| p.is_approved() && p.month == current_month)
            .map(|p| p.amount),
        "collected this month",
    )?;
    let collected_this_year = total_paid(payments, &window)?;

    let active: Vec<&Guardian> = guardians.iter().filter(|g| g.is_active()).collect();

    let overflow = |context: &str| LedgerError::AmountOverflow {
        context: context.to_string(),
    };

    let monthly_goal = checked_total(
        active.iter().map(|g| {
            let children: Vec<Student> = students
                .iter()
                .filter(|s| s.belongs_to(g.id))
                .cloned()
                .collect();
            monthly_obligation(&children, tariff)
        }),
        "annual goal",
    )?;
    let annual_goal = monthly_goal
        .checked_mul(Decimal::from(window.len()))
        .ok_or_else(|| overflow("annual goal"))?;

    let compliance_rate = if annual_goal > Decimal::ZERO {
        collected_this_year
            .checked_div(annual_goal)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| overflow("compliance rate"))?
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let mut guardians_in_arrears = 0;
    let mut pending_this_month = 0;
    if in_session {
        for guardian in &active {
            let own: Vec<Payment> = payments
                .iter()
                .filter(|p| p.guardian_id == guardian.id)
                .cloned()
                .collect();
            if !unpaid_months_before(&window, &own, current_month).is_empty() {
                guardians_in_arrears += 1;
            }
            if !own
                .iter()
                .any(|p| p.is_approved() && p.month == current_month)
            {
                pending_this_month += 1;
            }
        }
    }

    Ok(DashboardSummary {
        as_of: today,
        current_month,
        school_year: window.year(),
        in_session,
        collected_this_month,
        collected_this_year,
        annual_goal,
        compliance_rate,
        guardians_in_arrears,
        pending_this_month,
        active_guardians: active.len(),
        pending_reviews: payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
            .count(),
        students: StudentCounts::from_students(students),
    })
}
