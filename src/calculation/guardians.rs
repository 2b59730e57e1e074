//! Administrator guardian list.
//!
//! A guardian's monthly total is never stored; it is derived here from the
//! children currently assigned to them under the tariff in force.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Guardian, Student, Tariff};

use super::monthly_obligation;

/// A guardian with the figures derived from their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianRow {
    /// The guardian record.
    #[serde(flatten)]
    pub guardian: Guardian,
    /// Students assigned to the guardian.
    pub student_count: usize,
    /// Sum of the children's level tariffs.
    pub monthly_obligation: Decimal,
}

/// Lists guardians by name with their derived monthly obligation.
///
/// A non-blank `query` keeps only guardians whose name or email contains
/// it, ignoring case.
pub fn list_guardians(
    guardians: &[Guardian],
    students: &[Student],
    tariff: &Tariff,
    query: Option<&str>,
) -> Vec<GuardianRow> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let mut rows: Vec<GuardianRow> = guardians
        .iter()
        .filter(|g| query.is_none_or(|q| g.matches(q)))
        .map(|g| {
            let children: Vec<Student> = students
                .iter()
                .filter(|s| s.belongs_to(g.id))
                .cloned()
                .collect();
            GuardianRow {
                guardian: g.clone(),
                student_count: children.len(),
                monthly_obligation: monthly_obligation(&children, tariff),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.guardian.full_name.cmp(&b.guardian.full_name));
    rows
}
