//! Tariff model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Level;

fn default_active() -> bool {
    true
}

/// Monthly tuition rates for one school year.
///
/// # Example
///
/// ```
/// use tuition_ledger::models::{Level, Tariff};
/// use rust_decimal::Decimal;
///
/// let tariff = Tariff {
///     year: 2026,
///     primary: Decimal::new(100, 0),
///     secondary: Decimal::new(150, 0),
///     active: true,
/// };
/// assert_eq!(tariff.rate_for(Level::Secondary), Decimal::new(150, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    /// The school year these rates apply to.
    pub year: i32,
    /// Monthly rate for a primary student.
    pub primary: Decimal,
    /// Monthly rate for a secondary student.
    pub secondary: Decimal,
    /// Whether this is the tariff in force for its year.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Tariff {
    /// The monthly rate for a student at `level`.
    pub fn rate_for(&self, level: Level) -> Decimal {
        match level {
            Level::Primary => self.primary,
            Level::Secondary => self.secondary,
        }
    }
}
