//! Printable HTML reports.
//!
//! Every report is a self-contained page: inline stylesheet, a print button
//! that hides itself when printed, and a header naming the school and the
//! date the report was produced.

mod arrears;
mod payments;
mod roster;
mod statement;

use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rust_decimal::Decimal;

use crate::config::SchoolConfig;

pub use arrears::render_arrears;
pub use payments::{PaymentReportKind, render_payments};
pub use roster::{RosterFilter, render_roster};
pub use statement::render_statement;

/// School details and date printed on every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// The school's display name.
    pub school_name: String,
    /// Currency symbol printed before amounts.
    pub currency: String,
    /// The date the report is produced for.
    pub generated_on: NaiveDate,
}

impl ReportContext {
    /// Builds the context from the school settings.
    pub fn new(school: &SchoolConfig, generated_on: NaiveDate) -> Self {
        Self {
            school_name: school.name.clone(),
            currency: school.currency.clone(),
            generated_on,
        }
    }

    /// An amount with the currency and two decimals, e.g. `Bs 350.00`.
    pub fn money(&self, amount: Decimal) -> String {
        format!("{} {:.2}", self.currency, amount.round_dp(2))
    }
}

/// A date as `dd/mm/yyyy`.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

fn page(ctx: &ReportContext, title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=5.0";
                title { (title) " - " (ctx.school_name) }
                style { (PreEscaped(CSS)) }
            }
            body {
                button.print-btn onclick="window.print()" { "Print" }
                div.header {
                    h1 { (ctx.school_name) }
                    h2 { (title) }
                    p { "Date: " (format_date(ctx.generated_on)) }
                }
                (body)
            }
        }
    }
}

fn summary_card(label: &str, value: &str) -> Markup {
    html! {
        div.summary-card {
            strong { (label) }
            br;
            (value)
        }
    }
}

const CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, sans-serif; padding: 20px; background: #fff; color: #1f2937; }
.header { text-align: center; margin-bottom: 30px; }
.header h1 { color: #2563eb; font-size: 1.5rem; }
.header h2 { font-size: 1.2rem; color: #334155; margin-top: 0.5rem; }
.header p { margin: 5px 0; color: #666; font-size: 0.9rem; }
.summary { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; margin-bottom: 20px; }
.summary-card { background: #f3f4f6; padding: 15px; border-radius: 8px; text-align: center; }
.section { margin-bottom: 25px; }
.section h3 { color: #1e40af; margin-bottom: 10px; }
.info-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 10px; }
.info-item { background: #f9fafb; padding: 10px; border-radius: 5px; }
.notice { background: #fef3c7; border: 2px solid #f59e0b; padding: 30px; border-radius: 10px; margin: 30px auto; max-width: 600px; text-align: center; }
.calc { background: #dbeafe; border-left: 4px solid #3b82f6; padding: 15px; border-radius: 5px; margin-top: 15px; }
.overdue { color: #dc2626; font-weight: bold; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th { background: #2563eb; color: white; padding: 12px 8px; text-align: left; font-size: 0.9rem; }
td { padding: 10px 8px; border-bottom: 1px solid #e5e7eb; font-size: 0.85rem; }
tr:nth-child(even) { background: #f9fafb; }
.print-btn { margin: 20px 0; padding: 10px 20px; background: #2563eb; color: white; border: none; cursor: pointer; border-radius: 5px; font-size: 1rem; }
@media print { .print-btn { display: none; } }
@media (max-width: 768px) {
    body { padding: 10px; }
    .summary, .info-grid { grid-template-columns: 1fr; }
}
"#;
