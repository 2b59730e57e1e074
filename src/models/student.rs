//! Student model and related types.
//!
//! This module defines the [`Student`] struct, the school [`Level`] that
//! decides which tariff applies, and the four-character [`StudentCode`]
//! guardians use to claim a student.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::validation::is_valid_full_name;

/// The school level a student is enrolled in.
///
/// Levels order primary before secondary, which is the order coverage is
/// allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Primary school.
    #[serde(alias = "Primary", alias = "primaria", alias = "Primaria")]
    Primary,
    /// Secondary school.
    #[serde(alias = "Secondary", alias = "secundaria", alias = "Secundaria")]
    Secondary,
}

impl Level {
    /// Display label, e.g. `"Primary"`.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Primary => "Primary",
            Level::Secondary => "Secondary",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = LedgerError;

    /// Parses Spanish or English level names, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "primary" | "primaria" => Ok(Level::Primary),
            "secondary" | "secundaria" => Ok(Level::Secondary),
            other => Err(LedgerError::InvalidStudent {
                student: "-".to_string(),
                message: format!("level must be Primary or Secondary, got '{}'", other),
            }),
        }
    }
}

/// Whether a student has been claimed by a guardian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Not yet claimed.
    Available,
    /// Claimed by exactly one guardian.
    Assigned,
}

/// The unique four-character lookup token printed on the code sheet.
///
/// Codes are upper-case ASCII letters and digits.
///
/// ```
/// use tuition_ledger::models::StudentCode;
///
/// let code: StudentCode = " a3b7 ".parse().unwrap();
/// assert_eq!(code.as_str(), "A3B7");
/// assert!("A3B".parse::<StudentCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentCode(String);

impl StudentCode {
    /// Length of every student code.
    pub const LEN: usize = 4;

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps characters already known to be upper-case letters or digits.
    pub(crate) fn from_valid(code: String) -> Self {
        debug_assert_eq!(code.len(), Self::LEN);
        Self(code)
    }

    /// The numeric value of an all-digit code, e.g. `0042` is 42.
    pub fn numeric_value(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl fmt::Display for StudentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StudentCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase();
        let well_formed = normalised.len() == Self::LEN
            && normalised
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !well_formed {
            return Err(LedgerError::InvalidStudent {
                student: s.trim().to_string(),
                message: "code must be 4 letters or digits".to_string(),
            });
        }
        Ok(Self(normalised))
    }
}

impl TryFrom<String> for StudentCode {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StudentCode> for String {
    fn from(value: StudentCode) -> Self {
        value.0
    }
}

/// A student enrolled at the school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier for the student.
    pub id: Uuid,
    /// Lookup code used by guardians to claim the student.
    pub code: StudentCode,
    /// The student's full name.
    pub full_name: String,
    /// The level that decides the applicable tariff.
    pub level: Level,
    /// Grade within the level, e.g. "3ro".
    #[serde(default)]
    pub grade: Option<String>,
    /// Section (parallel) within the grade, e.g. "A".
    #[serde(default)]
    pub section: Option<String>,
    /// The guardian who claimed the student, if any.
    #[serde(default)]
    pub guardian_id: Option<Uuid>,
}

impl Student {
    /// Creates an unassigned student.
    pub fn new(code: StudentCode, full_name: impl Into<String>, level: Level) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            full_name: full_name.into(),
            level,
            grade: None,
            section: None,
            guardian_id: None,
        }
    }

    /// Available until a guardian claims the student.
    pub fn status(&self) -> StudentStatus {
        if self.guardian_id.is_some() {
            StudentStatus::Assigned
        } else {
            StudentStatus::Available
        }
    }

    /// Returns true if the student belongs to `guardian_id`.
    pub fn belongs_to(&self, guardian_id: Uuid) -> bool {
        self.guardian_id == Some(guardian_id)
    }

    /// Grade and section joined for display, e.g. `"3ro A"`.
    pub fn grade_section(&self) -> String {
        let parts: Vec<&str> = [self.grade.as_deref(), self.section.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Checks the record received from the store.
    pub fn validate(&self) -> LedgerResult<()> {
        if !is_valid_full_name(&self.full_name) {
            return Err(LedgerError::InvalidStudent {
                student: self.code.to_string(),
                message: format!("invalid full name '{}'", self.full_name),
            });
        }
        Ok(())
    }
}
