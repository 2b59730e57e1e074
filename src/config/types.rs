//! Configuration types for the school.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

const MIB: u64 = 1024 * 1024;

fn default_currency() -> String {
    "Bs".to_string()
}

fn default_phone_login_domain() -> String {
    "mailinator.com".to_string()
}

/// School-wide settings read from `school.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolConfig {
    /// Display name printed on reports.
    pub name: String,
    /// Currency symbol printed before amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// The single administrator account.
    pub admin_email: String,
    /// Domain appended to phone numbers used as login identifiers.
    #[serde(default = "default_phone_login_domain")]
    pub phone_login_domain: String,
    /// Months in which tuition accrues.
    #[serde(default)]
    pub calendar: SchoolCalendar,
    /// Limits applied to proof-of-payment images.
    #[serde(default)]
    pub uploads: UploadLimits,
}

/// The school-year window boundaries, as month numbers.
///
/// The window runs from `first_month` to `last_month` inclusive within a
/// single calendar year. Defaults to February through November.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolCalendar {
    /// First month of the window (1 = January).
    pub first_month: u32,
    /// Last month of the window.
    pub last_month: u32,
}

impl Default for SchoolCalendar {
    fn default() -> Self {
        Self {
            first_month: 2,
            last_month: 11,
        }
    }
}

impl SchoolCalendar {
    /// Checks that the boundaries form a window inside one year.
    pub fn validate(&self) -> LedgerResult<()> {
        if !(1..=12).contains(&self.first_month)
            || !(1..=12).contains(&self.last_month)
            || self.first_month > self.last_month
        {
            return Err(LedgerError::ConfigParseError {
                path: "calendar".to_string(),
                message: format!(
                    "window must satisfy 1 <= first_month <= last_month <= 12, got {}..{}",
                    self.first_month, self.last_month
                ),
            });
        }
        Ok(())
    }
}

/// Limits for proof-of-payment images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Largest accepted file, in bytes.
    pub max_proof_bytes: u64,
    /// Accepted MIME types.
    pub allowed_proof_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_proof_bytes: 5 * MIB,
            allowed_proof_types: ["image/jpeg", "image/jpg", "image/png", "image/gif"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
