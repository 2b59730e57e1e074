//! Payment listing report.

use std::collections::HashMap;

use chrono::Datelike;
use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Guardian, Payment, PaymentStatus};

use super::{ReportContext, format_date, page, summary_card};

/// Which payments a payment report lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentReportKind {
    /// Uploaded during the report date's calendar month.
    Month,
    /// Uploaded during the report date's calendar year.
    Year,
    /// Still awaiting review.
    Pending,
}

impl PaymentReportKind {
    fn title(&self) -> &'static str {
        match self {
            PaymentReportKind::Month => "Payments This Month",
            PaymentReportKind::Year => "Payments This Year",
            PaymentReportKind::Pending => "Pending Payments",
        }
    }
}

fn status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Pending",
        PaymentStatus::Approved => "Approved",
        PaymentStatus::Rejected => "Rejected",
    }
}

/// Renders the payments selected by `kind`, newest upload first, with count,
/// total and average.
pub fn render_payments(
    ctx: &ReportContext,
    guardians: &[Guardian],
    payments: &[Payment],
    kind: PaymentReportKind,
) -> Markup {
    let today = ctx.generated_on;
    let mut listed: Vec<&Payment> = payments
        .iter()
        .filter(|p| {
            let uploaded = p.submitted_at.date_naive();
            match kind {
                PaymentReportKind::Month => {
                    uploaded.year() == today.year() && uploaded.month() == today.month()
                }
                PaymentReportKind::Year => uploaded.year() == today.year(),
                PaymentReportKind::Pending => p.status == PaymentStatus::Pending,
            }
        })
        .collect();
    listed.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let names: HashMap<Uuid, &str> = guardians
        .iter()
        .map(|g| (g.id, g.full_name.as_str()))
        .collect();

    let total: Decimal = listed.iter().map(|p| p.amount).sum();
    let average = if listed.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(listed.len())
    };

    let body = html! {
        div.summary {
            (summary_card("Payments", &listed.len().to_string()))
            (summary_card("Total", &ctx.money(total)))
            (summary_card("Average", &ctx.money(average)))
        }
        @if listed.is_empty() {
            p { "No payments to show." }
        } @else {
            table {
                thead {
                    tr {
                        th { "#" }
                        th { "Date" }
                        th { "Guardian" }
                        th { "Month" }
                        th { "Amount" }
                        th { "Status" }
                    }
                }
                tbody {
                    @for (i, payment) in listed.iter().enumerate() {
                        tr {
                            td { (i + 1) }
                            td { (format_date(payment.submitted_at.date_naive())) }
                            td { (names.get(&payment.guardian_id).copied().unwrap_or("N/A")) }
                            td { (payment.month.label()) }
                            td { strong { (ctx.money(payment.amount)) } }
                            td { (status_label(payment.status)) }
                        }
                    }
                }
            }
        }
    };

    page(ctx, kind.title(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuardianStatus;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn ctx() -> ReportContext {
        ReportContext {
            school_name: "Unidad Educativa San Andrés".to_string(),
            currency: "Bs".to_string(),
            generated_on: NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
        }
    }

    fn create_test_guardian() -> Guardian {
        Guardian {
            id: Uuid::new_v4(),
            full_name: "Rosa Condori".to_string(),
            phone: Some("71234567".to_string()),
            email: None,
            status: GuardianStatus::Active,
            registered_at: None,
        }
    }

    fn create_test_payment(guardian_id: Uuid, amount: i64, day: (i32, u32, u32), status: PaymentStatus) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            guardian_id,
            month: "2026-03".parse().unwrap(),
            amount: Decimal::new(amount, 0),
            status,
            proof_url: String::new(),
            submitted_at: Utc.with_ymd_and_hms(day.0, day.1, day.2, 10, 0, 0).unwrap(),
            review_note: None,
        }
    }

    fn create_test_payments(guardian_id: Uuid) -> Vec<Payment> {
        vec![
            create_test_payment(guardian_id, 300, (2026, 4, 2), PaymentStatus::Approved),
            create_test_payment(guardian_id, 100, (2026, 4, 15), PaymentStatus::Pending),
            create_test_payment(guardian_id, 500, (2026, 2, 10), PaymentStatus::Approved),
            create_test_payment(guardian_id, 900, (2025, 11, 10), PaymentStatus::Pending),
        ]
    }

    #[test]
    fn test_month_report_totals_and_order() {
        let rosa = create_test_guardian();
        let payments = create_test_payments(rosa.id);
        let html = render_payments(&ctx(), &[rosa], &payments, PaymentReportKind::Month).into_string();

        assert!(html.contains("Payments This Month"));
        assert!(html.contains("Bs 400.00"));
        assert!(html.contains("Bs 200.00"));
        assert!(html.contains("Rosa Condori"));
        let newest = html.find("15/04/2026").unwrap();
        let older = html.find("02/04/2026").unwrap();
        assert!(newest < older);
        assert!(!html.contains("10/02/2026"));
    }

    #[test]
    fn test_year_and_pending_reports() {
        let rosa = create_test_guardian();
        let payments = create_test_payments(rosa.id);

        let year = render_payments(&ctx(), &[rosa.clone()], &payments, PaymentReportKind::Year).into_string();
        assert!(year.contains("Bs 900.00"));
        assert!(year.contains("10/02/2026"));
        assert!(!year.contains("10/11/2025"));

        let pending = render_payments(&ctx(), &[rosa], &payments, PaymentReportKind::Pending).into_string();
        assert!(pending.contains("Bs 1000.00"));
        assert!(pending.contains("Bs 500.00"));
        assert!(pending.contains("10/11/2025"));
    }

    #[test]
    fn test_unknown_guardian_and_empty() {
        let payments = vec![create_test_payment(Uuid::new_v4(), 50, (2026, 4, 1), PaymentStatus::Pending)];
        let html = render_payments(&ctx(), &[], &payments, PaymentReportKind::Pending).into_string();
        assert!(html.contains("N/A"));

        let html = render_payments(&ctx(), &[], &[], PaymentReportKind::Month).into_string();
        assert!(html.contains("No payments to show."));
        assert!(html.contains("Bs 0.00"));
    }
}
