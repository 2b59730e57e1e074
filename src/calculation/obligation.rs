//! Monthly obligation and payment totals.
//!
//! A guardian owes the sum of their children's level tariffs every month
//! of the window. These functions derive that figure and measure how many
//! months the approved payments cover.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Payment, Student, Tariff};

use super::SchoolWindow;

/// Decimal places kept on `months_covered`.
pub const MONTHS_COVERED_SCALE: u32 = 4;

/// Sum of the tariff for each child's level.
///
/// ```
/// use tuition_ledger::calculation::monthly_obligation;
/// use tuition_ledger::models::{Level, Student, Tariff};
/// use rust_decimal::Decimal;
///
/// let tariff = Tariff {
///     year: 2026,
///     primary: Decimal::new(100, 0),
///     secondary: Decimal::new(150, 0),
///     active: true,
/// };
/// let children = vec![
///     Student::new("0001".parse().unwrap(), "Ana Quispe", Level::Primary),
///     Student::new("0002".parse().unwrap(), "Luis Quispe", Level::Secondary),
/// ];
/// assert_eq!(monthly_obligation(&children, &tariff), Decimal::new(250, 0));
/// ```
pub fn monthly_obligation(students: &[Student], tariff: &Tariff) -> Decimal {
    students.iter().map(|s| tariff.rate_for(s.level)).sum()
}

/// Adds `amounts`, failing with [`LedgerError::AmountOverflow`] instead of
/// panicking when the total leaves the decimal range.
pub fn checked_total<I>(amounts: I, context: &str) -> LedgerResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| LedgerError::AmountOverflow {
            context: context.to_string(),
        })
}

/// Sum of approved payments tagged for a month inside `window`.
pub fn total_paid(payments: &[Payment], window: &SchoolWindow) -> LedgerResult<Decimal> {
    checked_total(
        payments
            .iter()
            .filter(|p| p.is_approved() && window.contains(p.month))
            .map(|p| p.amount),
        "total paid",
    )
}

/// How many months of obligation `total` pays for.
///
/// Zero when there is no obligation. The quotient is truncated to
/// [`MONTHS_COVERED_SCALE`] places so its floor is exact.
pub fn months_covered(total: Decimal, obligation: Decimal) -> Decimal {
    if obligation <= Decimal::ZERO || total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (total / obligation)
        .round_dp_with_strategy(MONTHS_COVERED_SCALE, RoundingStrategy::ToZero)
        .normalize()
}

/// `months_covered` rounded down to whole months.
pub fn whole_months(months_covered: Decimal) -> u32 {
    months_covered.floor().to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchoolCalendar;
    use crate::models::{Level, PaymentStatus, YearMonth};
    use chrono::Utc;
    use proptest::prelude::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_tariff() -> Tariff {
        Tariff {
            year: 2026,
            primary: dec("350.00"),
            secondary: dec("400.00"),
            active: true,
        }
    }

    fn student(code: &str, level: Level) -> Student {
        Student::new(code.parse().unwrap(), "Ana Quispe", level)
    }

    fn payment(month: &str, amount: &str, status: PaymentStatus) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            guardian_id: Uuid::nil(),
            month: month.parse::<YearMonth>().unwrap(),
            amount: dec(amount),
            status,
            proof_url: String::new(),
            submitted_at: Utc::now(),
            review_note: None,
        }
    }

    fn window() -> SchoolWindow {
        SchoolCalendar::default().window(2026)
    }

    #[test]
    fn test_obligation_sums_level_tariffs() {
        let children = vec![
            student("0001", Level::Primary),
            student("0002", Level::Secondary),
            student("0003", Level::Primary),
        ];
        assert_eq!(
            monthly_obligation(&children, &create_test_tariff()),
            dec("1100.00")
        );
    }

    #[test]
    fn test_obligation_without_children_is_zero() {
        assert_eq!(monthly_obligation(&[], &create_test_tariff()), Decimal::ZERO);
    }

    #[test]
    fn test_total_paid_counts_only_approved_in_window() {
        let payments = vec![
            payment("2026-02", "350.00", PaymentStatus::Approved),
            payment("2026-03", "350.00", PaymentStatus::Approved),
            payment("2026-04", "350.00", PaymentStatus::Pending),
            payment("2026-05", "350.00", PaymentStatus::Rejected),
            payment("2025-11", "350.00", PaymentStatus::Approved),
            payment("2026-12", "350.00", PaymentStatus::Approved),
        ];
        assert_eq!(total_paid(&payments, &window()).unwrap(), dec("700.00"));
    }

    #[test]
    fn test_total_paid_overflow_is_an_error() {
        let payments = vec![
            payment("2026-02", "79228162514264337593543950335", PaymentStatus::Approved),
            payment("2026-03", "79228162514264337593543950335", PaymentStatus::Approved),
        ];
        assert!(matches!(
            total_paid(&payments, &window()),
            Err(LedgerError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_months_covered_fractional() {
        assert_eq!(months_covered(dec("875"), dec("350")), dec("2.5"));
        assert_eq!(months_covered(dec("100"), dec("300")), dec("0.3333"));
    }

    #[test]
    fn test_months_covered_zero_obligation() {
        assert_eq!(months_covered(dec("500"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_whole_months_floors() {
        assert_eq!(whole_months(dec("2.9999")), 2);
        assert_eq!(whole_months(dec("3")), 3);
        assert_eq!(whole_months(Decimal::ZERO), 0);
    }

    proptest! {
        /// Property: whole months times the obligation never exceeds what was paid,
        /// and one more month always would.
        #[test]
        fn whole_months_bracket_total_paid(
            paid_cents in 0i64..10_000_000i64,
            obligation_cents in 1i64..200_000i64,
        ) {
            let paid = Decimal::new(paid_cents, 2);
            let obligation = Decimal::new(obligation_cents, 2);
            let whole = Decimal::from(whole_months(months_covered(paid, obligation)));

            prop_assert!(whole * obligation <= paid);
            prop_assert!((whole + Decimal::ONE) * obligation > paid);
        }
    }
}
