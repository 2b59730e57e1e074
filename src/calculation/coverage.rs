//! Per-child coverage allocation.
//!
//! The amount a guardian has paid is one fungible pool. It is consumed
//! child by child, primary students first, each taking up to its own
//! monthly tariff.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{ChildCoverage, CoverageStatus, Student, Tariff};

/// Spreads `pool` over `students` and reports each child's coverage.
///
/// Children are ordered primary before secondary, keeping the given order
/// within a level. A child whose tariff the remaining pool cannot fully
/// pay gets a `Partial` share rounded half away from zero to whole percent.
///
/// # Example
///
/// ```
/// use tuition_ledger::calculation::allocate_coverage;
/// use tuition_ledger::models::{CoverageStatus, Level, Student, Tariff};
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
///     Student::new("0002".parse().unwrap(), "Eva Quispe", Level::Primary),
///     Student::new("0003".parse().unwrap(), "Leo Quispe", Level::Primary),
/// ];
///
/// let coverage = allocate_coverage(&children, &tariff, Decimal::new(250, 0));
/// assert_eq!(coverage[0].coverage, CoverageStatus::Covered);
/// assert_eq!(coverage[1].coverage, CoverageStatus::Covered);
/// assert_eq!(coverage[2].coverage, CoverageStatus::Partial { percent: 50 });
/// ```
pub fn allocate_coverage(
    students: &[Student],
    tariff: &Tariff,
    pool: Decimal,
) -> Vec<ChildCoverage> {
    let mut ordered: Vec<&Student> = students.iter().collect();
    ordered.sort_by_key(|s| s.level);

    let mut remaining = pool.max(Decimal::ZERO);
    ordered
        .into_iter()
        .map(|student| {
            let rate = tariff.rate_for(student.level);
            let (allocated, coverage) = if remaining >= rate {
                (rate, CoverageStatus::Covered)
            } else if remaining > Decimal::ZERO {
                let percent = (remaining / rate * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_u32()
                    .unwrap_or(0);
                (remaining, CoverageStatus::Partial { percent })
            } else {
                (Decimal::ZERO, CoverageStatus::Uncovered)
            };
            remaining -= allocated;

            ChildCoverage {
                student_id: student.id,
                code: student.code.clone(),
                full_name: student.full_name.clone(),
                level: student.level,
                tariff: rate,
                allocated,
                coverage,
            }
        })
        .collect()
}
