//! Printable guardian statement.

use maud::{Markup, html};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{
    CoverageStatus, Guardian, LedgerStatement, Payment, PaymentStatus, Standing, Student,
};

use super::{ReportContext, format_date, or_dash, page};

fn standing_label(statement: &LedgerStatement) -> &'static str {
    match statement.standing {
        Standing::Current if !statement.in_session => "Up to date (school year not started)",
        Standing::Current => "Up to date",
        Standing::InArrears => "In arrears",
    }
}

fn coverage_label(coverage: &CoverageStatus) -> String {
    match coverage {
        CoverageStatus::Covered => "covered".to_string(),
        CoverageStatus::Partial { percent } => format!("{}% covered", percent),
        CoverageStatus::Uncovered => "not covered".to_string(),
    }
}

fn status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Pending",
        PaymentStatus::Approved => "Approved",
        PaymentStatus::Rejected => "Rejected",
    }
}

/// Renders a guardian's statement: contact details, children, the financial
/// summary with how months covered was derived, and the payment history.
///
/// `students` and `payments` are the guardian's own records, the same ones
/// the statement was calculated from.
pub fn render_statement(
    ctx: &ReportContext,
    guardian: &Guardian,
    students: &[Student],
    payments: &[Payment],
    statement: &LedgerStatement,
) -> Markup {
    let mut history: Vec<&Payment> = payments.iter().collect();
    history.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let months_in_year = if statement.monthly_obligation > Decimal::ZERO {
        (statement.annual_obligation / statement.monthly_obligation)
            .trunc()
            .to_u32()
            .unwrap_or(0)
    } else {
        0
    };
    let arrears: Vec<&str> = statement.arrears.iter().map(|m| m.name()).collect();
    let registered = guardian
        .registered_at
        .map(|at| format_date(at.date_naive()))
        .unwrap_or_else(|| "-".to_string());

    let body = html! {
        div.section {
            h3 { "Guardian" }
            div.info-grid {
                div.info-item { strong { "Name: " } (guardian.full_name) }
                div.info-item { strong { "Email: " } (or_dash(guardian.email.as_deref())) }
                div.info-item {
                    strong { "Phone: " }
                    (guardian.phone.as_deref().filter(|p| !p.is_empty()).unwrap_or("not registered"))
                }
                div.info-item { strong { "Registered: " } (registered) }
            }
        }

        div.section {
            h3 { "Students (" (students.len()) ")" }
            @if students.is_empty() {
                p { "No students registered." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Code" }
                            th { "Full name" }
                            th { "Level" }
                            th { "Grade" }
                            th { "Section" }
                        }
                    }
                    tbody {
                        @for student in students {
                            tr {
                                td { strong { (student.code.as_str()) } }
                                td { (student.full_name) }
                                td { (student.level.label()) }
                                td { (or_dash(student.grade.as_deref())) }
                                td { (or_dash(student.section.as_deref())) }
                            }
                        }
                    }
                }
            }
        }

        div.section {
            h3 { "Financial summary " (statement.school_year) }
            div.info-grid {
                div.info-item { strong { "Monthly obligation: " } (ctx.money(statement.monthly_obligation)) }
                div.info-item { strong { "Annual obligation: " } (ctx.money(statement.annual_obligation)) }
                div.info-item { strong { "Total paid: " } (ctx.money(statement.total_paid)) }
                div.info-item { strong { "Balance: " } (ctx.money(statement.balance)) }
                div.info-item {
                    strong { "Months paid: " }
                    (statement.whole_months_covered) " of " (months_in_year)
                }
                div.info-item {
                    strong { "Status: " }
                    @if statement.has_arrears() {
                        span.overdue { (standing_label(statement)) }
                    } @else {
                        (standing_label(statement))
                    }
                }
                @if statement.in_session {
                    div.info-item {
                        strong { "Pending months: " }
                        @if arrears.is_empty() {
                            "None"
                        } @else {
                            span.overdue { (arrears.join(", ")) }
                        }
                    }
                }
            }
            @if statement.in_session && statement.monthly_obligation > Decimal::ZERO {
                div.calc {
                    p {
                        strong { "Calculation: " }
                        (ctx.money(statement.total_paid)) " paid / "
                        (ctx.money(statement.monthly_obligation)) " per month = "
                        (statement.months_covered.to_string()) " months"
                    }
                    @for child in &statement.children {
                        p {
                            (child.code.as_str()) " " (child.full_name) ": "
                            (ctx.money(child.allocated)) " of " (ctx.money(child.tariff))
                            " (" (coverage_label(&child.coverage)) ")"
                        }
                    }
                }
            }
            @if !statement.in_session {
                div.notice {
                    h3 { "School break" }
                    p {
                        "Payments made now are an advance for the " (statement.school_year)
                        " school year. The advance of " (ctx.money(statement.advance_credit))
                        " covers " (statement.whole_months_covered) " months."
                    }
                }
            }
        }

        div.section {
            h3 { "Payment history" }
            @if history.is_empty() {
                p { "No payments recorded." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Date" }
                            th { "Month" }
                            th { "Amount" }
                            th { "Status" }
                        }
                    }
                    tbody {
                        @for payment in &history {
                            tr {
                                td { (format_date(payment.submitted_at.date_naive())) }
                                td { (payment.month.label()) }
                                td { (ctx.money(payment.amount)) }
                                td { (status_label(payment.status)) }
                            }
                        }
                    }
                }
            }
        }
    };

    page(ctx, "Guardian Statement", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_statement;
    use crate::config::SchoolCalendar;
    use crate::models::{GuardianStatus, Level, Tariff};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ctx(today: NaiveDate) -> ReportContext {
        ReportContext {
            school_name: "Unidad Educativa San Andrés".to_string(),
            currency: "Bs".to_string(),
            generated_on: today,
        }
    }

    fn create_test_guardian() -> Guardian {
        Guardian {
            id: Uuid::new_v4(),
            full_name: "Rosa Condori".to_string(),
            phone: None,
            email: Some("rosa@example.com".to_string()),
            status: GuardianStatus::Active,
            registered_at: Some(Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap()),
        }
    }

    fn create_test_tariff() -> Tariff {
        Tariff {
            year: 2026,
            primary: dec("100"),
            secondary: dec("150"),
            active: true,
        }
    }

    fn create_test_payment(guardian: &Guardian, amount: &str, day: u32) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            guardian_id: guardian.id,
            month: "2026-02".parse().unwrap(),
            amount: dec(amount),
            status: PaymentStatus::Approved,
            proof_url: String::new(),
            submitted_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
            review_note: None,
        }
    }

    fn render(today: NaiveDate, payments: &[Payment]) -> String {
        let guardian = create_test_guardian();
        let mut child = Student::new("A3B7".parse().unwrap(), "Ana Condori", Level::Primary);
        child.guardian_id = Some(guardian.id);
        let payments: Vec<Payment> = payments
            .iter()
            .cloned()
            .map(|mut p| {
                p.guardian_id = guardian.id;
                p
            })
            .collect();
        let students = vec![child];
        let statement = calculate_statement(
            &guardian,
            &students,
            &payments,
            &create_test_tariff(),
            &SchoolCalendar::default(),
            today,
        )
        .unwrap();
        render_statement(&ctx(today), &guardian, &students, &payments, &statement).into_string()
    }

    #[test]
    fn test_statement_in_session() {
        let guardian = create_test_guardian();
        let payments = vec![
            create_test_payment(&guardian, "150", 2),
            create_test_payment(&guardian, "100", 9),
        ];
        let html = render(NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(), &payments);

        assert!(html.contains("not registered"));
        assert!(html.contains("20/01/2026"));
        assert!(html.contains("Bs 250.00 paid / Bs 100.00 per month = 2.5 months"));
        assert!(html.contains("Months paid: </strong>2 of 10"));
        assert!(html.contains("April, May"));
        assert!(html.contains("In arrears"));
        let newer = html.find("09/03/2026").unwrap();
        let older = html.find("02/03/2026").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn test_statement_during_break_shows_advance() {
        let guardian = create_test_guardian();
        let payments = vec![create_test_payment(&guardian, "300", 2)];
        let html = render(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(), &payments);

        assert!(html.contains("School break"));
        assert!(html.contains("Up to date (school year not started)"));
        assert!(html.contains("The advance of Bs 300.00 covers 3 months."));
        assert!(!html.contains("Pending months"));
        assert!(!html.contains("Calculation: "));
        assert!(!html.contains("class=\"calc\""));
    }

    #[test]
    fn test_statement_without_payments() {
        let html = render(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), &[]);
        assert!(html.contains("No payments recorded."));
        assert!(html.contains("Up to date") || html.contains("In arrears"));
    }
}
