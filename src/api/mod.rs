//! HTTP API module for the tuition ledger.
//!
//! This module provides the JSON endpoints for statements, the dashboard,
//! payment review, registration, spreadsheet import and export, and the
//! printable HTML reports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CodeRequest, GuardianListRequest, LedgerSnapshot, ReleaseRequest, PaymentExportRequest, PaymentImportRequest, PaymentReportRequest,
    PaymentSubmitRequest, RegistrationRequest, ReviewRequest, RosterReportRequest,
    StatementRequest, StudentExportRequest, StudentImportRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, CodeResponse, RegistrationResponse, ReleaseResponse,
};
pub use state::AppState;
