//! Guardians-in-arrears report.

use maud::{Markup, html};

use crate::calculation::ArrearsList;

use super::{ReportContext, or_dash, page, summary_card};

const TITLE: &str = "Guardians in Arrears";

/// Renders the arrears list.
///
/// During the school break nobody can be in arrears, and the report is a
/// notice page instead of a table.
pub fn render_arrears(ctx: &ReportContext, list: &ArrearsList) -> Markup {
    if !list.in_session {
        let body = html! {
            div.notice {
                h3 { "School break" }
                p { "No guardians are in arrears outside the school year." }
                p { "Arrears are evaluated again when the " (list.school_year) " school year starts." }
            }
        };
        return page(ctx, TITLE, body);
    }

    let overdue_total: usize = list.guardians.iter().map(|g| g.months.len()).sum();

    let body = html! {
        div.summary {
            (summary_card("Guardians in arrears", &list.guardians.len().to_string()))
            (summary_card("Overdue months", &overdue_total.to_string()))
            (summary_card("School year", &list.school_year.to_string()))
        }
        p { "A school month is overdue once it has started without an approved payment." }
        @if list.guardians.is_empty() {
            p { "No guardians are in arrears." }
        } @else {
            table {
                thead {
                    tr {
                        th { "#" }
                        th { "Guardian" }
                        th { "Email" }
                        th { "Phone" }
                        th { "Students" }
                        th { "Overdue" }
                        th { "Months" }
                    }
                }
                tbody {
                    @for (i, guardian) in list.guardians.iter().enumerate() {
                        @let months: Vec<&str> = guardian.months.iter().map(|m| m.name()).collect();
                        tr {
                            td { (i + 1) }
                            td { (guardian.full_name) }
                            td { (or_dash(guardian.email.as_deref())) }
                            td { (or_dash(guardian.phone.as_deref())) }
                            td { (guardian.student_count) }
                            td.overdue { (guardian.months.len()) }
                            td { (months.join(", ")) }
                        }
                    }
                }
            }
        }
    };

    page(ctx, TITLE, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::OverdueGuardian;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn ctx() -> ReportContext {
        ReportContext {
            school_name: "Unidad Educativa San Andrés".to_string(),
            currency: "Bs".to_string(),
            generated_on: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
        }
    }

    fn create_test_list(in_session: bool) -> ArrearsList {
        ArrearsList {
            as_of: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            school_year: 2026,
            in_session,
            guardians: vec![OverdueGuardian {
                guardian_id: Uuid::new_v4(),
                full_name: "Rosa Condori".to_string(),
                email: Some("rosa@example.com".to_string()),
                phone: None,
                student_count: 2,
                months: vec!["2026-02".parse().unwrap(), "2026-04".parse().unwrap()],
            }],
        }
    }

    #[test]
    fn test_in_session_table() {
        let html = render_arrears(&ctx(), &create_test_list(true)).into_string();
        assert!(html.contains("Rosa Condori"));
        assert!(html.contains("February, April"));
        assert!(html.contains("<td class=\"overdue\">2</td>"));
        assert!(html.contains("<td>-</td>"));
    }

    #[test]
    fn test_break_shows_notice() {
        let mut list = create_test_list(false);
        list.guardians.clear();
        let html = render_arrears(&ctx(), &list).into_string();
        assert!(html.contains("School break"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_nobody_in_arrears() {
        let mut list = create_test_list(true);
        list.guardians.clear();
        let html = render_arrears(&ctx(), &list).into_string();
        assert!(html.contains("No guardians are in arrears."));
    }
}
