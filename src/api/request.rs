//! Request types for the tuition ledger API.
//!
//! Records arrive the way the remote store returns them and deserialize
//! straight into the domain models. Every request may carry `as_of`; when
//! absent the evaluation date is today.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::models::{
    Guardian, Payment, PaymentSubmission, ReviewDecision, Student, StudentCode,
};
use crate::reports::{PaymentReportKind, RosterFilter};
use crate::validation::{ProofUpload, RegistrationForm};

/// Request body for `/statement` and `/reports/statement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRequest {
    /// The guardian the statement is for.
    pub guardian: Guardian,
    /// The guardian's students.
    #[serde(default)]
    pub students: Vec<Student>,
    /// The guardian's payments.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Evaluation date.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl StatementRequest {
    /// Checks the guardian, student and payment records.
    pub fn validate(&self) -> LedgerResult<()> {
        self.guardian.validate()?;
        self.students.iter().try_for_each(Student::validate)?;
        self.payments.iter().try_for_each(Payment::validate)
    }
}

/// Request body for the school-wide endpoints: `/dashboard`, `/arrears`
/// and `/reports/arrears`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Every guardian.
    #[serde(default)]
    pub guardians: Vec<Guardian>,
    /// Every student.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Every payment.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Evaluation date.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl LedgerSnapshot {
    /// Checks every record in the snapshot.
    pub fn validate(&self) -> LedgerResult<()> {
        self.guardians.iter().try_for_each(Guardian::validate)?;
        self.students.iter().try_for_each(Student::validate)?;
        self.payments.iter().try_for_each(Payment::validate)
    }
}

/// Request body for `/guardians`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianListRequest {
    /// Every guardian.
    #[serde(default)]
    pub guardians: Vec<Guardian>,
    /// Every student, to derive each guardian's monthly total.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Name or email search text.
    #[serde(default)]
    pub query: Option<String>,
    /// Evaluation date, which picks the tariff.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl GuardianListRequest {
    /// Checks the guardian and student records.
    pub fn validate(&self) -> LedgerResult<()> {
        self.guardians.iter().try_for_each(Guardian::validate)?;
        self.students.iter().try_for_each(Student::validate)
    }
}

/// Request body for `/payments/review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// The payment under review.
    pub payment: Payment,
    /// The administrator's decision.
    #[serde(flatten)]
    pub decision: ReviewDecision,
}

/// Request body for `/payments/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubmitRequest {
    /// The submitting guardian.
    pub guardian_id: Uuid,
    /// Target month, `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
    /// Amount paid.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// The selected proof image.
    #[serde(default)]
    pub proof: Option<ProofUpload>,
    /// Where the proof image was stored.
    #[serde(default)]
    pub proof_url: String,
    /// Upload time; now when absent.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<&PaymentSubmitRequest> for PaymentSubmission {
    fn from(req: &PaymentSubmitRequest) -> Self {
        PaymentSubmission {
            month: req.month.clone(),
            amount: req.amount,
            proof: req.proof.clone(),
        }
    }
}

/// Request body for `/registration/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// The sign-up form.
    pub form: RegistrationForm,
    /// The current roster the codes are claimed from.
    #[serde(default)]
    pub students: Vec<Student>,
}

/// Request body for `/roster/release`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// The student to unassign.
    pub student: Student,
}

/// Request body for `/roster/code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeRequest {
    /// Codes already on the roster.
    #[serde(default)]
    pub existing_codes: Vec<StudentCode>,
    /// Continue the all-digit sequence instead of drawing a random code.
    #[serde(default)]
    pub sequential: bool,
}

/// Request body for `/import/students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentImportRequest {
    /// The spreadsheet as CSV text.
    pub csv: String,
    /// Codes already on the roster.
    #[serde(default)]
    pub existing_codes: Vec<StudentCode>,
}

/// Request body for `/import/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentImportRequest {
    /// The spreadsheet as CSV text.
    pub csv: String,
    /// Guardians the rows are resolved against.
    #[serde(default)]
    pub guardians: Vec<Guardian>,
}

/// Request body for `/export/students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentExportRequest {
    /// Students to export.
    #[serde(default)]
    pub students: Vec<Student>,
}

/// Request body for `/export/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentExportRequest {
    /// Payments to export.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Request body for `/reports/roster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterReportRequest {
    /// Every student.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Guardians, for the guardian and contact columns.
    #[serde(default)]
    pub guardians: Vec<Guardian>,
    /// Which students to list.
    #[serde(default)]
    pub filter: RosterFilter,
    /// Report date.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Request body for `/reports/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReportRequest {
    /// Which payments to list.
    pub kind: PaymentReportKind,
    /// Every payment.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Guardians, for the name column.
    #[serde(default)]
    pub guardians: Vec<Guardian>,
    /// Report date.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl PaymentReportRequest {
    /// Checks the payment amounts the report totals.
    pub fn validate(&self) -> LedgerResult<()> {
        self.payments.iter().try_for_each(Payment::validate)
    }
}
