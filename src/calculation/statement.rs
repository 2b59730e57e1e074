//! Guardian statement calculation.
//!
//! This module ties the ledger calculator together: it resolves the
//! school-year window, derives the obligation, spreads the paid pool over
//! the children and lists arrears, recording each decision as an
//! [`AuditStep`].

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use crate::config::SchoolCalendar;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Guardian, LedgerStatement, Payment, PaymentStatus,
    Standing, Student, Tariff, YearMonth,
};

use super::{
    allocate_coverage, monthly_obligation, months_covered, overdue_months, shortfall_months,
    total_paid, whole_months,
};

fn months_json(months: &[YearMonth]) -> serde_json::Value {
    json!(months.iter().map(ToString::to_string).collect::<Vec<_>>())
}

fn warning(code: &str, message: String, severity: &str) -> AuditWarning {
    AuditWarning {
        code: code.to_string(),
        message,
        severity: severity.to_string(),
    }
}

/// Checks that every child and payment belongs to `guardian`.
fn check_ownership(guardian: &Guardian, students: &[Student], payments: &[Payment]) -> LedgerResult<()> {
    if let Some(student) = students.iter().find(|s| !s.belongs_to(guardian.id)) {
        return Err(LedgerError::InvalidStudent {
            student: student.code.to_string(),
            message: format!("student is not assigned to guardian {}", guardian.id),
        });
    }
    if let Some(payment) = payments.iter().find(|p| p.guardian_id != guardian.id) {
        return Err(LedgerError::InvalidPayment {
            payment_id: payment.id.to_string(),
            message: format!("payment does not belong to guardian {}", guardian.id),
        });
    }
    Ok(())
}

/// Computes a guardian's statement as of `today`.
///
/// `students` are the guardian's children and `payments` every payment the
/// guardian has submitted, in any status. Only approved payments tagged
/// inside the window count toward `total_paid`.
///
/// # Errors
///
/// Returns `InvalidStudent` if a child is not assigned to the guardian and
/// `InvalidPayment` if a payment belongs to someone else.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use tuition_ledger::calculation::calculate_statement;
/// use tuition_ledger::config::SchoolCalendar;
/// use tuition_ledger::models::{
///     Guardian, GuardianStatus, Level, Payment, PaymentStatus, Standing, Student, Tariff,
/// };
/// use uuid::Uuid;
///
/// let guardian = Guardian {
///     id: Uuid::new_v4(),
///     full_name: "Rosa Condori".to_string(),
///     phone: Some("71234567".to_string()),
///     email: None,
///     status: GuardianStatus::Active,
///     registered_at: None,
/// };
/// let mut child = Student::new("0001".parse().unwrap(), "Ana Condori", Level::Primary);
/// child.guardian_id = Some(guardian.id);
/// let tariff = Tariff {
///     year: 2026,
///     primary: Decimal::new(100, 0),
///     secondary: Decimal::new(150, 0),
///     active: true,
/// };
/// let payment = Payment {
///     id: Uuid::new_v4(),
///     guardian_id: guardian.id,
///     month: "2026-02".parse().unwrap(),
///     amount: Decimal::new(300, 0),
///     status: PaymentStatus::Approved,
///     proof_url: String::new(),
///     submitted_at: Utc::now(),
///     review_note: None,
/// };
///
/// let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
/// let statement = calculate_statement(
///     &guardian,
///     &[child],
///     &[payment],
///     &tariff,
///     &SchoolCalendar::default(),
///     today,
/// )
/// .unwrap();
///
/// assert_eq!(statement.whole_months_covered, 3);
/// assert_eq!(statement.elapsed_months, 5);
/// assert_eq!(statement.arrears.len(), 2);
/// assert_eq!(statement.standing, Standing::InArrears);
/// ```
pub fn calculate_statement(
    guardian: &Guardian,
    students: &[Student],
    payments: &[Payment],
    tariff: &Tariff,
    calendar: &SchoolCalendar,
    today: NaiveDate,
) -> LedgerResult<LedgerStatement> {
    let start_time = Instant::now();
    check_ownership(guardian, students, payments)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    // Step 1: window
    let position = calendar.position(today);
    let window = position.window();
    let in_session = position.is_in_session();
    steps.push(AuditStep {
        step_number,
        rule_id: "school_window".to_string(),
        rule_name: "School Year Window".to_string(),
        input: json!({
            "as_of": today.to_string(),
            "first_month": calendar.first_month,
            "last_month": calendar.last_month,
        }),
        output: json!({
            "school_year": window.year(),
            "in_session": in_session,
            "window_months": window.len(),
        }),
        reasoning: if in_session {
            format!("{} falls inside the {} school year", today, window.year())
        } else {
            format!(
                "{} is outside the school year; payments apply to the {} window",
                today,
                window.year()
            )
        },
    });
    step_number += 1;

    if tariff.year != window.year() {
        warnings.push(warning(
            "TARIFF_YEAR_MISMATCH",
            format!(
                "Tariff for {} applied to the {} school year",
                tariff.year,
                window.year()
            ),
            "medium",
        ));
    }
    if !tariff.active {
        warnings.push(warning(
            "INACTIVE_TARIFF",
            format!("Tariff for {} is not marked active", tariff.year),
            "low",
        ));
    }

    // Step 2: obligation
    let monthly = monthly_obligation(students, tariff);
    let annual = monthly * Decimal::from(window.len());
    steps.push(AuditStep {
        step_number,
        rule_id: "monthly_obligation".to_string(),
        rule_name: "Monthly Obligation".to_string(),
        input: json!({
            "children": students
                .iter()
                .map(|s| json!({ "code": s.code.as_str(), "level": s.level }))
                .collect::<Vec<_>>(),
            "primary_rate": tariff.primary.to_string(),
            "secondary_rate": tariff.secondary.to_string(),
        }),
        output: json!({
            "monthly_obligation": monthly.to_string(),
            "annual_obligation": annual.to_string(),
        }),
        reasoning: format!(
            "{} children owe {} per month, {} over {} months",
            students.len(),
            monthly,
            annual,
            window.len()
        ),
    });
    step_number += 1;

    if students.is_empty() {
        warnings.push(warning(
            "NO_CHILDREN",
            "Guardian has no students assigned".to_string(),
            "low",
        ));
    }

    // Step 3: payments
    let paid = total_paid(payments, &window)?;
    let counted = payments
        .iter()
        .filter(|p| p.is_approved() && window.contains(p.month))
        .count();
    steps.push(AuditStep {
        step_number,
        rule_id: "total_paid".to_string(),
        rule_name: "Approved Payments In Window".to_string(),
        input: json!({
            "payments": payments.len(),
            "school_year": window.year(),
        }),
        output: json!({
            "counted_payments": counted,
            "total_paid": paid.to_string(),
        }),
        reasoning: format!(
            "{} of {} payments are approved and tagged inside the window, totalling {}",
            counted,
            payments.len(),
            paid
        ),
    });
    step_number += 1;

    let pending = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .count();
    if pending > 0 {
        warnings.push(warning(
            "PENDING_PAYMENTS",
            format!("{} payments await review and are not counted", pending),
            "low",
        ));
    }
    let outside = payments
        .iter()
        .filter(|p| p.is_approved() && !window.contains(p.month))
        .count();
    if outside > 0 {
        warnings.push(warning(
            "PAYMENTS_OUTSIDE_WINDOW",
            format!("{} approved payments are tagged outside the window", outside),
            "low",
        ));
    }

    // Step 4: coverage
    let covered = months_covered(paid, monthly);
    let whole = whole_months(covered);
    let children = allocate_coverage(students, tariff, paid);
    steps.push(AuditStep {
        step_number,
        rule_id: "coverage_allocation".to_string(),
        rule_name: "Coverage Allocation".to_string(),
        input: json!({
            "total_paid": paid.to_string(),
            "monthly_obligation": monthly.to_string(),
        }),
        output: json!({
            "months_covered": covered.to_string(),
            "whole_months_covered": whole,
            "children": serde_json::to_value(&children).unwrap_or_default(),
        }),
        reasoning: format!(
            "{} / {} = {} months; pool allocated primary first",
            paid, monthly, covered
        ),
    });
    step_number += 1;

    // Step 5: arrears
    let (elapsed, arrears, overdue, standing, advance_credit) = if !in_session {
        (0, Vec::new(), Vec::new(), Standing::Current, paid)
    } else {
        let elapsed = window.elapsed_months(today);
        let (arrears, overdue) = if monthly.is_zero() {
            (Vec::new(), Vec::new())
        } else {
            (
                shortfall_months(&window, whole, elapsed),
                overdue_months(&window, payments, today),
            )
        };
        let standing = if arrears.is_empty() {
            Standing::Current
        } else {
            Standing::InArrears
        };
        (elapsed, arrears, overdue, standing, Decimal::ZERO)
    };
    steps.push(AuditStep {
        step_number,
        rule_id: "arrears".to_string(),
        rule_name: "Arrears".to_string(),
        input: json!({
            "in_session": in_session,
            "elapsed_months": elapsed,
            "whole_months_covered": whole,
        }),
        output: json!({
            "arrears": months_json(&arrears),
            "overdue_months": months_json(&overdue),
            "standing": standing,
            "advance_credit": advance_credit.to_string(),
        }),
        reasoning: match standing {
            _ if !in_session => format!(
                "Outside the school year arrears are not evaluated; {} paid ahead",
                advance_credit
            ),
            Standing::Current => format!(
                "{} whole months paid cover {} elapsed months",
                whole, elapsed
            ),
            Standing::InArrears => format!(
                "{} whole months paid against {} elapsed months leaves {} unpaid",
                whole,
                elapsed,
                arrears.len()
            ),
        },
    });

    let duration = start_time.elapsed();
    Ok(LedgerStatement {
        guardian_id: guardian.id,
        school_year: window.year(),
        as_of: today,
        in_session,
        monthly_obligation: monthly,
        annual_obligation: annual,
        total_paid: paid,
        balance: annual - paid,
        months_covered: covered,
        whole_months_covered: whole,
        elapsed_months: elapsed,
        children,
        arrears,
        overdue_months: overdue,
        standing,
        advance_credit,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: duration.as_micros() as u64,
        },
    })
}
