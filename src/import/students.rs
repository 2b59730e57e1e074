//! Student spreadsheet import.

use std::collections::HashSet;
use std::io::Read;

use csv::{ReaderBuilder, Trim};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Level, Student, StudentCode};
use crate::roster::next_sequential_code;
use crate::validation::is_valid_full_name;

use super::{ImportReport, RowError, columns};

/// Reads students from CSV.
///
/// `existing` are the codes already on the roster. Rows without a code
/// receive the next sequential code. Invalid rows are reported in
/// [`ImportReport::errors`] while valid rows are still imported.
///
/// # Errors
///
/// `ImportError` when the file has no header, lacks the full name or level
/// column, or has no data rows.
///
/// # Example
///
/// ```
/// use tuition_ledger::import::import_students;
///
/// let csv = "Nombre Completo,Nivel,Grado,Paralelo\nAna Quispe,Primaria,3ro,A\n";
/// let report = import_students(csv.as_bytes(), &[]).unwrap();
/// assert_eq!(report.imported[0].code.as_str(), "0001");
/// assert!(report.errors.is_empty());
/// ```
pub fn import_students<R: Read>(
    reader: R,
    existing: &[StudentCode],
) -> LedgerResult<ImportReport<Student>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LedgerError::ImportError {
            message: format!("could not read header row: {}", e),
        })?
        .clone();
    let name_col = columns::require(&headers, columns::FULL_NAME, "full name")?;
    let level_col = columns::require(&headers, columns::LEVEL, "level")?;
    let grade_col = columns::find(&headers, columns::GRADE);
    let section_col = columns::find(&headers, columns::SECTION);
    let code_col = columns::find(&headers, columns::CODE);

    let mut taken: HashSet<StudentCode> = existing.iter().cloned().collect();
    let mut report = ImportReport::default();
    let mut rows = 0;

    for (line_num, result) in reader.records().enumerate() {
        let row = line_num + 2;
        rows += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                report.errors.push(RowError::new(row, e.to_string()));
                continue;
            }
        };
        if record.iter().all(|c| c.trim().is_empty()) {
            rows -= 1;
            continue;
        }

        let Some(full_name) = columns::cell(&record, Some(name_col)) else {
            report.errors.push(RowError::new(row, "missing full name"));
            continue;
        };
        if !is_valid_full_name(full_name) {
            report
                .errors
                .push(RowError::new(row, format!("invalid full name '{}'", full_name)));
            continue;
        }
        let Some(level) = columns::cell(&record, Some(level_col)) else {
            report
                .errors
                .push(RowError::new(row, "missing level (Primary/Secondary)"));
            continue;
        };
        let level: Level = match level.parse() {
            Ok(level) => level,
            Err(_) => {
                report.errors.push(RowError::new(
                    row,
                    format!("level must be Primary or Secondary, got '{}'", level),
                ));
                continue;
            }
        };

        let code = match columns::cell(&record, code_col) {
            Some(raw) => match raw.parse::<StudentCode>() {
                Ok(code) if taken.contains(&code) => {
                    report
                        .errors
                        .push(RowError::new(row, format!("code {} already exists", code)));
                    continue;
                }
                Ok(code) => code,
                Err(_) => {
                    report.errors.push(RowError::new(
                        row,
                        format!("code '{}' must be 4 letters or digits", raw),
                    ));
                    continue;
                }
            },
            None => match next_sequential_code(&taken) {
                Ok(code) => code,
                Err(e) => {
                    report.errors.push(RowError::new(row, e.to_string()));
                    continue;
                }
            },
        };
        taken.insert(code.clone());

        let mut student = Student::new(code, full_name, level);
        student.grade = columns::cell(&record, grade_col).map(String::from);
        student.section = columns::cell(&record, section_col).map(String::from);
        report.imported.push(student);
    }

    if rows == 0 {
        return Err(LedgerError::ImportError {
            message: "the file has no data rows".to_string(),
        });
    }

    Ok(report)
}
