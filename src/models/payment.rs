//! Payment model, review transitions and receipt submission.
//!
//! A payment moves `pending → approved` or `pending → rejected` exactly
//! once. Approved payments are what the ledger counts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::UploadLimits;
use crate::error::{FieldError, LedgerError, LedgerResult};
use crate::validation::{
    AMOUNT_RANGE_MESSAGE, ProofUpload, into_result, is_valid_amount, validate_proof,
};

use super::YearMonth;

/// Review status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Uploaded by the guardian, awaiting review.
    #[serde(alias = "pendiente")]
    Pending,
    /// Accepted by the administrator.
    #[serde(alias = "aprobado")]
    Approved,
    /// Refused by the administrator.
    #[serde(alias = "rechazado")]
    Rejected,
}

impl PaymentStatus {
    /// Lower-case name, e.g. `"approved"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(PaymentStatus::Pending),
            "approved" | "aprobado" => Ok(PaymentStatus::Approved),
            "rejected" | "rechazado" => Ok(PaymentStatus::Rejected),
            other => Err(LedgerError::InvalidPayment {
                payment_id: "-".to_string(),
                message: format!("unknown status '{}'", other),
            }),
        }
    }
}

/// An administrator's decision on a pending payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Accept the payment.
    Approve,
    /// Refuse the payment, optionally explaining why.
    Reject {
        /// Reason shown to the guardian.
        #[serde(default)]
        note: Option<String>,
    },
}

/// A tuition payment reported by a guardian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for the payment.
    pub id: Uuid,
    /// The guardian who made the payment.
    pub guardian_id: Uuid,
    /// The month this payment is for.
    pub month: YearMonth,
    /// The amount paid.
    pub amount: Decimal,
    /// Review status.
    pub status: PaymentStatus,
    /// Public URL of the uploaded receipt image.
    pub proof_url: String,
    /// When the receipt was uploaded.
    pub submitted_at: DateTime<Utc>,
    /// Note left by the reviewer on rejection.
    #[serde(default)]
    pub review_note: Option<String>,
}

impl Payment {
    /// Returns true if the payment has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Approved
    }

    /// Checks a payment record received from the store.
    ///
    /// The amount must lie in `(0, MAX_PAYMENT_AMOUNT]` so that totals stay
    /// meaningful and bounded.
    pub fn validate(&self) -> LedgerResult<()> {
        if !is_valid_amount(self.amount) {
            return Err(LedgerError::Validation {
                errors: vec![FieldError::new(
                    "amount",
                    format!("payment {}: {}", self.id, AMOUNT_RANGE_MESSAGE),
                )],
            });
        }
        Ok(())
    }

    /// Marks a pending payment as approved.
    pub fn approve(&mut self) -> LedgerResult<()> {
        self.transition(PaymentStatus::Approved)
    }

    /// Marks a pending payment as rejected.
    pub fn reject(&mut self, note: Option<String>) -> LedgerResult<()> {
        self.transition(PaymentStatus::Rejected)?;
        self.review_note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Ok(())
    }

    /// Applies an administrator decision.
    ///
    /// ```
    /// use tuition_ledger::models::{Payment, PaymentStatus, ReviewDecision};
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let mut payment = Payment {
    ///     id: Uuid::new_v4(),
    ///     guardian_id: Uuid::new_v4(),
    ///     month: "2026-03".parse().unwrap(),
    ///     amount: Decimal::new(350, 0),
    ///     status: PaymentStatus::Pending,
    ///     proof_url: "https://img.example/1.png".to_string(),
    ///     submitted_at: Utc::now(),
    ///     review_note: None,
    /// };
    /// payment.review(&ReviewDecision::Approve).unwrap();
    /// assert!(payment.is_approved());
    /// assert!(payment.review(&ReviewDecision::Reject { note: None }).is_err());
    /// ```
    pub fn review(&mut self, decision: &ReviewDecision) -> LedgerResult<()> {
        match decision {
            ReviewDecision::Approve => self.approve(),
            ReviewDecision::Reject { note } => self.reject(note.clone()),
        }
    }

    fn transition(&mut self, to: PaymentStatus) -> LedgerResult<()> {
        if self.status != PaymentStatus::Pending {
            return Err(LedgerError::InvalidTransition {
                payment_id: self.id.to_string(),
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}

/// The receipt form a guardian fills in before the proof image is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSubmission {
    /// Target month as typed, `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
    /// Amount paid.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// The selected proof image.
    #[serde(default)]
    pub proof: Option<ProofUpload>,
}

/// A submission that passed validation and may be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    /// Target month.
    pub month: YearMonth,
    /// Amount paid.
    pub amount: Decimal,
}

impl PaymentSubmission {
    /// Validates the form, reporting every failing field.
    pub fn validate(&self, limits: &UploadLimits) -> LedgerResult<ValidatedSubmission> {
        let mut errors = Vec::new();

        let month = match self.month.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError::new("month", "month is required"));
                None
            }
            Some(raw) => match raw.parse::<YearMonth>() {
                Ok(month) => Some(month),
                Err(err) => {
                    errors.push(FieldError::new("month", err.to_string()));
                    None
                }
            },
        };

        let amount = match self.amount {
            None => {
                errors.push(FieldError::new("amount", "amount is required"));
                None
            }
            Some(amount) if !is_valid_amount(amount) => {
                errors.push(FieldError::new("amount", AMOUNT_RANGE_MESSAGE));
                None
            }
            Some(amount) => Some(amount),
        };

        match &self.proof {
            None => errors.push(FieldError::new("proof", "a receipt image is required")),
            Some(proof) => {
                if let Err(err) = validate_proof(proof, limits) {
                    errors.push(err);
                }
            }
        }

        into_result(errors)?;
        match (month, amount) {
            (Some(month), Some(amount)) => Ok(ValidatedSubmission { month, amount }),
            _ => Err(LedgerError::Validation {
                errors: vec![FieldError::new("form", "incomplete submission")],
            }),
        }
    }
}

impl ValidatedSubmission {
    /// Builds the pending payment once the proof has been uploaded.
    pub fn into_payment(
        self,
        guardian_id: Uuid,
        proof_url: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            guardian_id,
            month: self.month,
            amount: self.amount,
            status: PaymentStatus::Pending,
            proof_url: proof_url.into(),
            submitted_at,
            review_note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_payment() -> Payment {
        Payment {
            id: Uuid::new_v4(),
            guardian_id: Uuid::new_v4(),
            month: "2026-03".parse().unwrap(),
            amount: Decimal::new(35000, 2),
            status: PaymentStatus::Pending,
            proof_url: "https://img.example/receipt.png".to_string(),
            submitted_at: Utc::now(),
            review_note: None,
        }
    }

    fn png(size_bytes: u64) -> Option<ProofUpload> {
        Some(ProofUpload {
            content_type: "image/png".to_string(),
            size_bytes,
        })
    }

    #[test]
    fn test_deserialize_store_record_with_spanish_status() {
        let json = r#"{
            "id": "5a0c3a51-9f8e-4f59-bb0a-0d1a4d9e7f10",
            "guardian_id": "0b7e7c3e-2d7c-4a8e-b5c2-5e1f0c9d2a11",
            "month": "2026-04",
            "amount": "350.00",
            "status": "aprobado",
            "proof_url": "https://img.example/a.png",
            "submitted_at": "2026-04-03T14:00:00Z"
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert!(payment.is_approved());
        assert_eq!(payment.month.to_string(), "2026-04");
        assert_eq!(payment.amount, Decimal::new(35000, 2));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Rejected).unwrap(),
            "\"rejected\""
        );
        assert_eq!("Aprobado".parse::<PaymentStatus>().unwrap(), PaymentStatus::Approved);
        assert!("paid".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_amounts() {
        let mut payment = pending_payment();
        assert!(payment.validate().is_ok());

        payment.amount = Decimal::new(-700, 0);
        match payment.validate() {
            Err(LedgerError::Validation { errors }) => {
                assert_eq!(errors[0].field, "amount");
                assert!(errors[0].message.contains(&payment.id.to_string()));
            }
            other => panic!("expected a validation error, got {:?}", other),
        }

        payment.amount = Decimal::MAX;
        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_approve_pending() {
        let mut payment = pending_payment();
        payment.approve().unwrap();
        assert_eq!(payment.status, PaymentStatus::Approved);
    }

    #[test]
    fn test_approved_payment_is_immutable() {
        let mut payment = pending_payment();
        payment.approve().unwrap();

        match payment.reject(Some("late".to_string())) {
            Err(LedgerError::InvalidTransition { from, to, .. }) => {
                assert_eq!(from, "approved");
                assert_eq!(to, "rejected");
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
        assert!(payment.approve().is_err());
        assert_eq!(payment.status, PaymentStatus::Approved);
        assert_eq!(payment.review_note, None);
    }

    #[test]
    fn test_reject_records_trimmed_note() {
        let mut payment = pending_payment();
        payment.reject(Some("  blurry receipt ".to_string())).unwrap();
        assert_eq!(payment.status, PaymentStatus::Rejected);
        assert_eq!(payment.review_note.as_deref(), Some("blurry receipt"));
    }

    #[test]
    fn test_rejected_cannot_be_approved() {
        let mut payment = pending_payment();
        payment.reject(None).unwrap();
        assert!(payment.approve().is_err());
    }

    #[test]
    fn test_review_decision_serde() {
        let decision: ReviewDecision =
            serde_json::from_str(r#"{"decision":"reject","note":"wrong month"}"#).unwrap();
        assert_eq!(
            decision,
            ReviewDecision::Reject {
                note: Some("wrong month".to_string())
            }
        );
        let decision: ReviewDecision = serde_json::from_str(r#"{"decision":"approve"}"#).unwrap();
        assert_eq!(decision, ReviewDecision::Approve);
    }

    #[test]
    fn test_submission_valid_becomes_pending_payment() {
        let submission = PaymentSubmission {
            month: Some("2026-05".to_string()),
            amount: Some(Decimal::new(350, 0)),
            proof: png(2048),
        };
        let validated = submission.validate(&UploadLimits::default()).unwrap();
        let guardian_id = Uuid::new_v4();
        let payment = validated.into_payment(guardian_id, "https://img.example/x.png", Utc::now());
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.guardian_id, guardian_id);
        assert_eq!(payment.month.to_string(), "2026-05");
    }

    #[test]
    fn test_submission_reports_every_missing_field() {
        let submission = PaymentSubmission {
            month: None,
            amount: Some(Decimal::ZERO),
            proof: None,
        };
        match submission.validate(&UploadLimits::default()) {
            Err(LedgerError::Validation { errors }) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["month", "amount", "proof"]);
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_submission_rejects_non_image_proof() {
        let submission = PaymentSubmission {
            month: Some("2026-05".to_string()),
            amount: Some(Decimal::new(350, 0)),
            proof: Some(ProofUpload {
                content_type: "application/pdf".to_string(),
                size_bytes: 10,
            }),
        };
        assert!(submission.validate(&UploadLimits::default()).is_err());
    }
}
