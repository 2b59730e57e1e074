//! Guardian model.
//!
//! A guardian is the paying adult. The monthly total a guardian owes is
//! never stored on the record; it is derived from the current roster and
//! tariff by [`crate::calculation::monthly_obligation`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::validation::{is_valid_email, is_valid_full_name, is_valid_phone};

/// Lifecycle status of a guardian account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardianStatus {
    /// Registered and counted in collections.
    #[serde(alias = "activo")]
    Active,
    /// Awaiting activation.
    #[serde(alias = "pendiente")]
    Pending,
    /// Disabled.
    #[serde(alias = "inactivo")]
    Inactive,
}

/// The paying adult responsible for one or more students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    /// Unique identifier for the guardian.
    pub id: Uuid,
    /// The guardian's full name.
    pub full_name: String,
    /// Eight digit phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Account status.
    pub status: GuardianStatus,
    /// When the guardian registered.
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
}

impl Guardian {
    /// Returns true if the account is active.
    pub fn is_active(&self) -> bool {
        self.status == GuardianStatus::Active
    }

    /// Preferred contact: phone, then email, then `"-"`.
    pub fn contact(&self) -> &str {
        self.phone
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.email.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or("-")
    }

    /// Returns true if the name or email contains `query`, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.full_name.to_lowercase().contains(&query)
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&query))
    }

    /// Checks the record received from the store.
    pub fn validate(&self) -> LedgerResult<()> {
        if !is_valid_full_name(&self.full_name) {
            return Err(LedgerError::InvalidGuardian {
                field: "full_name".to_string(),
                message: format!("invalid full name '{}'", self.full_name),
            });
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            if !is_valid_phone(phone) {
                return Err(LedgerError::InvalidGuardian {
                    field: "phone".to_string(),
                    message: "phone must be 8 digits".to_string(),
                });
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(LedgerError::InvalidGuardian {
                    field: "email".to_string(),
                    message: format!("invalid email '{}'", email),
                });
            }
        }
        Ok(())
    }
}
