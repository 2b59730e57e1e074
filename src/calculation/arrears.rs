//! Arrears detection.
//!
//! Two readings of "unpaid" live here. [`shortfall_months`] compares the
//! amount paid with the elapsed obligation, while [`overdue_months`] looks
//! for an approved payment tagged with each elapsed month.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SchoolCalendar;
use crate::models::{Guardian, Payment, Student, YearMonth};

use super::SchoolWindow;

/// Elapsed window months the paid amount does not reach, earliest first.
///
/// These are `window.months()[whole_months_covered..elapsed]`, empty when
/// the payments cover every elapsed month.
///
/// ```
/// use tuition_ledger::calculation::shortfall_months;
/// use tuition_ledger::config::SchoolCalendar;
///
/// let window = SchoolCalendar::default().window(2026);
/// let months = shortfall_months(&window, 3, 5);
/// let names: Vec<&str> = months.iter().map(|m| m.name()).collect();
/// assert_eq!(names, vec!["May", "June"]);
/// ```
pub fn shortfall_months(
    window: &SchoolWindow,
    whole_months_covered: u32,
    elapsed: u32,
) -> Vec<YearMonth> {
    let months = window.months();
    let end = (elapsed as usize).min(months.len());
    let start = (whole_months_covered as usize).min(end);
    months[start..end].to_vec()
}

fn approved_months(payments: &[Payment]) -> HashSet<YearMonth> {
    payments
        .iter()
        .filter(|p| p.is_approved())
        .map(|p| p.month)
        .collect()
}

/// Elapsed window months with no approved payment tagged for them.
pub fn overdue_months(
    window: &SchoolWindow,
    payments: &[Payment],
    today: NaiveDate,
) -> Vec<YearMonth> {
    let paid = approved_months(payments);
    window
        .elapsed(today)
        .into_iter()
        .filter(|m| !paid.contains(m))
        .collect()
}

/// Window months strictly before `month` with no approved payment.
pub fn unpaid_months_before(
    window: &SchoolWindow,
    payments: &[Payment],
    month: YearMonth,
) -> Vec<YearMonth> {
    let paid = approved_months(payments);
    window
        .months()
        .into_iter()
        .filter(|m| *m < month && !paid.contains(m))
        .collect()
}

/// A guardian with overdue months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueGuardian {
    /// The guardian's id.
    pub guardian_id: Uuid,
    /// The guardian's full name.
    pub full_name: String,
    /// Email address, if known.
    pub email: Option<String>,
    /// Phone number, if known.
    pub phone: Option<String>,
    /// How many students the guardian has.
    pub student_count: usize,
    /// Overdue months, earliest first.
    pub months: Vec<YearMonth>,
}

/// Every guardian with overdue months on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrearsList {
    /// The date evaluated.
    pub as_of: NaiveDate,
    /// The school year evaluated.
    pub school_year: i32,
    /// False in the break, when nobody is evaluated.
    pub in_session: bool,
    /// Guardians in arrears, most overdue months first.
    pub guardians: Vec<OverdueGuardian>,
}

/// Builds the arrears list for `today`.
///
/// Outside the school year the list is empty. Inside it, guardians are
/// ordered by overdue month count descending, then by name.
pub fn list_overdue_guardians(
    guardians: &[Guardian],
    students: &[Student],
    payments: &[Payment],
    calendar: &SchoolCalendar,
    today: NaiveDate,
) -> ArrearsList {
    let position = calendar.position(today);
    let window = position.window();

    let mut overdue = Vec::new();
    if position.is_in_session() {
        for guardian in guardians {
            let own_payments: Vec<Payment> = payments
                .iter()
                .filter(|p| p.guardian_id == guardian.id)
                .cloned()
                .collect();
            let months = overdue_months(&window, &own_payments, today);
            if months.is_empty() {
                continue;
            }
            overdue.push(OverdueGuardian {
                guardian_id: guardian.id,
                full_name: guardian.full_name.clone(),
                email: guardian.email.clone(),
                phone: guardian.phone.clone(),
                student_count: students.iter().filter(|s| s.belongs_to(guardian.id)).count(),
                months,
            });
        }
        overdue.sort_by(|a, b| {
            b.months
                .len()
                .cmp(&a.months.len())
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
    }

    ArrearsList {
        as_of: today,
        school_year: window.year(),
        in_session: position.is_in_session(),
        guardians: overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuardianStatus, Level, PaymentStatus};
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn window() -> SchoolWindow {
        SchoolCalendar::default().window(2026)
    }

    fn approved(guardian_id: Uuid, month: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            guardian_id,
            month: ym(month),
            amount: Decimal::new(350, 0),
            status: PaymentStatus::Approved,
            proof_url: String::new(),
            submitted_at: Utc::now(),
            review_note: None,
        }
    }

    fn guardian(name: &str) -> Guardian {
        Guardian {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            phone: None,
            email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
            status: GuardianStatus::Active,
            registered_at: None,
        }
    }

    #[test]
    fn test_shortfall_two_earliest_unpaid() {
        let months = shortfall_months(&window(), 3, 5);
        assert_eq!(months, vec![ym("2026-05"), ym("2026-06")]);
    }

    #[test]
    fn test_shortfall_empty_when_covered() {
        assert!(shortfall_months(&window(), 5, 5).is_empty());
        assert!(shortfall_months(&window(), 9, 5).is_empty());
    }

    #[test]
    fn test_shortfall_clipped_to_window() {
        assert_eq!(shortfall_months(&window(), 0, 40).len(), 10);
    }

    #[test]
    fn test_overdue_months_tag_based() {
        let id = Uuid::new_v4();
        let mut rejected = approved(id, "2026-03");
        rejected.status = PaymentStatus::Rejected;
        let payments = vec![approved(id, "2026-02"), rejected, approved(id, "2026-09")];

        let months = overdue_months(&window(), &payments, date(2026, 5, 10));
        assert_eq!(months, vec![ym("2026-03"), ym("2026-04"), ym("2026-05")]);
    }

    #[test]
    fn test_unpaid_before_excludes_current_month() {
        let id = Uuid::new_v4();
        let payments = vec![approved(id, "2026-02")];
        let months = unpaid_months_before(&window(), &payments, ym("2026-04"));
        assert_eq!(months, vec![ym("2026-03")]);
    }

    #[test]
    fn test_list_sorted_by_overdue_count() {
        let ana = guardian("Ana Rojas");
        let beto = guardian("Beto Flores");
        let carla = guardian("Carla Vargas");
        let payments = vec![
            approved(ana.id, "2026-02"),
            approved(ana.id, "2026-03"),
            approved(carla.id, "2026-02"),
            approved(carla.id, "2026-03"),
            approved(carla.id, "2026-04"),
        ];
        let students = vec![{
            let mut s = Student::new("0001".parse().unwrap(), "Luz Flores", Level::Primary);
            s.guardian_id = Some(beto.id);
            s
        }];

        let list = list_overdue_guardians(
            &[ana.clone(), beto.clone(), carla],
            &students,
            &payments,
            &SchoolCalendar::default(),
            date(2026, 4, 20),
        );

        assert!(list.in_session);
        let names: Vec<&str> = list.guardians.iter().map(|g| g.full_name.as_str()).collect();
        assert_eq!(names, vec!["Beto Flores", "Ana Rojas"]);
        assert_eq!(list.guardians[0].months.len(), 3);
        assert_eq!(list.guardians[0].student_count, 1);
        assert_eq!(list.guardians[1].months, vec![ym("2026-04")]);
    }

    #[test]
    fn test_list_empty_out_of_session() {
        let list = list_overdue_guardians(
            &[guardian("Ana Rojas")],
            &[],
            &[],
            &SchoolCalendar::default(),
            date(2026, 12, 15),
        );
        assert!(!list.in_session);
        assert_eq!(list.school_year, 2027);
        assert!(list.guardians.is_empty());
    }

    proptest! {
        /// Property: shortfall length is elapsed minus whole months, clipped to zero.
        #[test]
        fn shortfall_length_matches_gap(covered in 0u32..15, elapsed in 0u32..=10) {
            let months = shortfall_months(&window(), covered, elapsed);
            prop_assert_eq!(months.len() as u32, elapsed.saturating_sub(covered));
            for month in &months {
                prop_assert!(window().contains(*month));
            }
        }
    }
}
