//! Payment spreadsheet import.

use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Guardian, Payment, PaymentStatus, YearMonth};
use crate::validation::{AMOUNT_RANGE_MESSAGE, is_valid_amount};

use super::{ImportReport, RowError, columns};

/// Resolves a guardian cell by id, then by email ignoring case.
fn resolve_guardian<'a>(guardians: &'a [Guardian], value: &str) -> Option<&'a Guardian> {
    if let Ok(id) = Uuid::parse_str(value) {
        return guardians.iter().find(|g| g.id == id);
    }
    guardians.iter().find(|g| {
        g.email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(value))
    })
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

struct PaymentColumns {
    guardian: usize,
    month: usize,
    amount: usize,
    status: Option<usize>,
    proof: Option<usize>,
    submitted_at: Option<usize>,
}

impl PaymentColumns {
    fn resolve(headers: &StringRecord) -> LedgerResult<Self> {
        Ok(Self {
            guardian: columns::require(headers, columns::GUARDIAN, "guardian")?,
            month: columns::require(headers, columns::MONTH, "month")?,
            amount: columns::require(headers, columns::AMOUNT, "amount")?,
            status: columns::find(headers, columns::STATUS),
            proof: columns::find(headers, columns::PROOF),
            submitted_at: columns::find(headers, columns::SUBMITTED_AT),
        })
    }

    fn parse_row(
        &self,
        record: &StringRecord,
        guardians: &[Guardian],
        default_submitted_at: DateTime<Utc>,
    ) -> Result<Payment, String> {
        let guardian_cell =
            columns::cell(record, Some(self.guardian)).ok_or("missing guardian")?;
        let guardian = resolve_guardian(guardians, guardian_cell)
            .ok_or_else(|| format!("unknown guardian '{}'", guardian_cell))?;

        let month_cell = columns::cell(record, Some(self.month)).ok_or("missing month")?;
        let month: YearMonth = month_cell.parse().map_err(|e: LedgerError| e.to_string())?;

        let amount_cell = columns::cell(record, Some(self.amount)).ok_or("missing amount")?;
        let amount = Decimal::from_str(amount_cell)
            .map_err(|_| format!("amount '{}' is not a number", amount_cell))?;
        if !is_valid_amount(amount) {
            return Err(AMOUNT_RANGE_MESSAGE.to_string());
        }

        let status = match columns::cell(record, self.status) {
            Some(raw) => raw
                .parse::<PaymentStatus>()
                .map_err(|_| format!("unknown status '{}'", raw))?,
            None => PaymentStatus::Pending,
        };

        let submitted_at = match columns::cell(record, self.submitted_at) {
            Some(raw) => {
                parse_timestamp(raw).ok_or_else(|| format!("invalid timestamp '{}'", raw))?
            }
            None => default_submitted_at,
        };

        Ok(Payment {
            id: Uuid::new_v4(),
            guardian_id: guardian.id,
            month,
            amount,
            status,
            proof_url: columns::cell(record, self.proof)
                .unwrap_or_default()
                .to_string(),
            submitted_at,
            review_note: None,
        })
    }
}

/// Reads payments from CSV, resolving each row's guardian against `guardians`.
///
/// Rows without a status are imported as pending. Rows without an upload
/// timestamp use `submitted_at`.
///
/// # Errors
///
/// `ImportError` when the guardian, month or amount column is missing or
/// there are no data rows.
pub fn import_payments<R: Read>(
    reader: R,
    guardians: &[Guardian],
    submitted_at: DateTime<Utc>,
) -> LedgerResult<ImportReport<Payment>> {
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
    let cols = PaymentColumns::resolve(&headers)?;

    let mut report = ImportReport::default();
    let mut rows = 0;
    for (line_num, result) in reader.records().enumerate() {
        let row = line_num + 2;
        rows += 1;
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|record| cols.parse_row(&record, guardians, submitted_at));
        match parsed {
            Ok(payment) => report.imported.push(payment),
            Err(message) => report.errors.push(RowError::new(row, message)),
        }
    }

    if rows == 0 {
        return Err(LedgerError::ImportError {
            message: "the file has no data rows".to_string(),
        });
    }

    Ok(report)
}
