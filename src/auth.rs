//! Role resolution and login identifier normalisation.
//!
//! Sessions live with the external authentication provider. This module
//! only decides which dashboard an account belongs to and turns what a
//! user typed into the email the provider expects.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, LedgerError, LedgerResult};
use crate::validation::is_valid_phone;

/// Which side of the application an account uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The single school administrator.
    Administrator,
    /// A paying guardian.
    Guardian,
}

impl Role {
    /// Administrator iff `email` is the configured administrator address.
    ///
    /// ```
    /// use tuition_ledger::auth::Role;
    ///
    /// assert_eq!(Role::for_email("Colegio1@Gmail.com", "colegio1@gmail.com"), Role::Administrator);
    /// assert_eq!(Role::for_email("71234567@mailinator.com", "colegio1@gmail.com"), Role::Guardian);
    /// ```
    pub fn for_email(email: &str, admin_email: &str) -> Self {
        if email.trim().eq_ignore_ascii_case(admin_email.trim()) {
            Role::Administrator
        } else {
            Role::Guardian
        }
    }
}

/// The provider login for what the user typed.
///
/// Emails pass through unchanged. An eight digit phone becomes
/// `{phone}@{phone_domain}`.
pub fn login_email(identifier: &str, phone_domain: &str) -> LedgerResult<String> {
    let identifier = identifier.trim();
    if identifier.contains('@') {
        return Ok(identifier.to_string());
    }
    if is_valid_phone(identifier) {
        return Ok(format!("{}@{}", identifier, phone_domain));
    }
    Err(LedgerError::Validation {
        errors: vec![FieldError::new(
            "identifier",
            "enter a valid email or an 8 digit phone",
        )],
    })
}
