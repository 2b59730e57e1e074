//! Student roster report.

use std::collections::HashMap;

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Guardian, Level, Student, StudentStatus};

use super::{ReportContext, or_dash, page, summary_card};

/// Which students a roster report lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterFilter {
    /// Every student.
    #[default]
    All,
    /// Primary students.
    Primary,
    /// Secondary students.
    Secondary,
    /// Students no guardian has claimed.
    Available,
    /// Students claimed by a guardian.
    Assigned,
}

impl RosterFilter {
    fn keeps(&self, student: &Student) -> bool {
        match self {
            RosterFilter::All => true,
            RosterFilter::Primary => student.level == Level::Primary,
            RosterFilter::Secondary => student.level == Level::Secondary,
            RosterFilter::Available => student.status() == StudentStatus::Available,
            RosterFilter::Assigned => student.status() == StudentStatus::Assigned,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            RosterFilter::All => "Student Roster",
            RosterFilter::Primary => "Student Roster - Primary",
            RosterFilter::Secondary => "Student Roster - Secondary",
            RosterFilter::Available => "Student Roster - Available",
            RosterFilter::Assigned => "Student Roster - Assigned",
        }
    }
}

/// Renders the roster of students matching `filter`, ordered by name.
///
/// Assigned students show their guardian and the guardian's contact.
pub fn render_roster(
    ctx: &ReportContext,
    students: &[Student],
    guardians: &[Guardian],
    filter: RosterFilter,
) -> Markup {
    let mut listed: Vec<&Student> = students.iter().filter(|s| filter.keeps(s)).collect();
    listed.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    let by_id: HashMap<Uuid, &Guardian> = guardians.iter().map(|g| (g.id, g)).collect();

    let primary = listed.iter().filter(|s| s.level == Level::Primary).count();
    let secondary = listed.len() - primary;

    let body = html! {
        div.summary {
            (summary_card("Total", &listed.len().to_string()))
            (summary_card("Primary", &primary.to_string()))
            (summary_card("Secondary", &secondary.to_string()))
        }
        @if listed.is_empty() {
            p { "No students match this filter." }
        } @else {
            table {
                thead {
                    tr {
                        th { "#" }
                        th { "Code" }
                        th { "Full name" }
                        th { "Level" }
                        th { "Grade" }
                        th { "Section" }
                        th { "Status" }
                        th { "Guardian" }
                        th { "Contact" }
                    }
                }
                tbody {
                    @for (i, student) in listed.iter().enumerate() {
                        @let guardian = student.guardian_id.and_then(|id| by_id.get(&id).copied());
                        tr {
                            td { (i + 1) }
                            td { strong { (student.code.as_str()) } }
                            td { (student.full_name) }
                            td { (student.level.label()) }
                            td { (or_dash(student.grade.as_deref())) }
                            td { (or_dash(student.section.as_deref())) }
                            td {
                                @match student.status() {
                                    StudentStatus::Available => { "Available" }
                                    StudentStatus::Assigned => { "Assigned" }
                                }
                            }
                            @match guardian {
                                Some(guardian) => {
                                    td { (guardian.full_name) }
                                    td { (guardian.contact()) }
                                }
                                None => {
                                    td { "-" }
                                    td { "-" }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    page(ctx, filter.title(), body)
}
