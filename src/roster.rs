//! Student roster operations.
//!
//! Guardians claim students with the code printed on the code sheet. A
//! claim is all-or-nothing: every code is resolved and checked before any
//! student changes hands.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Student, StudentCode};

/// Characters used for random codes. `I`, `O`, `0` and `1` are left out.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const MAX_SEQUENTIAL: u32 = 9999;
const RANDOM_ATTEMPTS: usize = 64;

/// Assigns the students carrying `codes` to `guardian_id`.
///
/// Returns the ids of the claimed students in the order of `codes`. Fails
/// without touching any student if a code is repeated (`DuplicateCode`),
/// unknown (`StudentNotFound`) or already claimed (`StudentAlreadyAssigned`).
///
/// ```
/// use tuition_ledger::models::{Level, Student};
/// use tuition_ledger::roster::claim_students;
/// use uuid::Uuid;
///
/// let mut students = vec![Student::new("A3B7".parse().unwrap(), "Ana Quispe", Level::Primary)];
/// let guardian = Uuid::new_v4();
/// claim_students(guardian, &["A3B7".parse().unwrap()], &mut students).unwrap();
/// assert!(students[0].belongs_to(guardian));
/// ```
pub fn claim_students(
    guardian_id: Uuid,
    codes: &[StudentCode],
    students: &mut [Student],
) -> LedgerResult<Vec<Uuid>> {
    let mut seen = HashSet::new();
    let mut indexes = Vec::with_capacity(codes.len());

    for code in codes {
        if !seen.insert(code) {
            return Err(LedgerError::DuplicateCode {
                code: code.to_string(),
            });
        }
        let index = students
            .iter()
            .position(|s| &s.code == code)
            .ok_or_else(|| LedgerError::StudentNotFound {
                code: code.to_string(),
            })?;
        if let Some(owner) = students[index].guardian_id {
            return Err(LedgerError::StudentAlreadyAssigned {
                code: code.to_string(),
                guardian_id: owner.to_string(),
            });
        }
        indexes.push(index);
    }

    Ok(indexes
        .into_iter()
        .map(|index| {
            students[index].guardian_id = Some(guardian_id);
            students[index].id
        })
        .collect())
}

/// Unassigns a student, returning the previous guardian.
pub fn release_student(student: &mut Student) -> Option<Uuid> {
    student.guardian_id.take()
}

/// The next all-digit code: the highest numeric code plus one, zero-padded.
///
/// Codes containing letters are ignored. An empty roster starts at `0001`.
pub fn next_sequential_code<'a, I>(existing: I) -> LedgerResult<StudentCode>
where
    I: IntoIterator<Item = &'a StudentCode>,
{
    let max = existing
        .into_iter()
        .filter_map(StudentCode::numeric_value)
        .max()
        .unwrap_or(0);
    if max >= MAX_SEQUENTIAL {
        return Err(LedgerError::ImportError {
            message: format!("no sequential code left after {:04}", max),
        });
    }
    format!("{:04}", max + 1).parse()
}

/// A random code from [`CODE_ALPHABET`].
pub fn random_code() -> StudentCode {
    let bytes = Uuid::new_v4().into_bytes();
    let code: String = bytes
        .iter()
        .take(StudentCode::LEN)
        .map(|b| CODE_ALPHABET[*b as usize % CODE_ALPHABET.len()] as char)
        .collect();
    StudentCode::from_valid(code)
}

/// A random code not present in `existing`.
pub fn unique_random_code(existing: &HashSet<StudentCode>) -> LedgerResult<StudentCode> {
    (0..RANDOM_ATTEMPTS)
        .map(|_| random_code())
        .find(|code| !existing.contains(code))
        .ok_or_else(|| LedgerError::DuplicateCode {
            code: "random".to_string(),
        })
}
