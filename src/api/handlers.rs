//! HTTP request handlers for the tuition ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use std::collections::HashSet;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use maud::Markup;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{Role, login_email};
use crate::calculation::{
    DashboardSummary, GuardianRow, calculate_statement, list_guardians, list_overdue_guardians,
    summarize_dashboard,
};
use crate::config::ConfigLoader;
use crate::error::{LedgerError, LedgerResult};
use crate::import::{import_payments, import_students, payments_to_csv, students_to_csv};
use crate::models::{LedgerStatement, PaymentSubmission, Student, StudentCode, Tariff};
use crate::reports::{
    ReportContext, render_arrears, render_payments, render_roster, render_statement,
};
use crate::roster::{claim_students, next_sequential_code, release_student, unique_random_code};

use super::request::{
    CodeRequest, GuardianListRequest, LedgerSnapshot, ReleaseRequest, PaymentExportRequest, PaymentImportRequest, PaymentReportRequest,
    PaymentSubmitRequest, RegistrationRequest, ReviewRequest, RosterReportRequest,
    StatementRequest, StudentExportRequest, StudentImportRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, CodeResponse, RegistrationResponse, ReleaseResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/statement", post(statement_handler))
        .route("/dashboard", post(dashboard_handler))
        .route("/arrears", post(arrears_handler))
        .route("/guardians", post(guardians_handler))
        .route("/payments/review", post(review_handler))
        .route("/payments/submit", post(submit_handler))
        .route("/registration/validate", post(registration_handler))
        .route("/roster/release", post(release_handler))
        .route("/roster/code", post(code_handler))
        .route("/import/students", post(import_students_handler))
        .route("/import/payments", post(import_payments_handler))
        .route("/export/students", post(export_students_handler))
        .route("/export/payments", post(export_payments_handler))
        .route("/reports/roster", post(roster_report_handler))
        .route("/reports/payments", post(payments_report_handler))
        .route("/reports/arrears", post(arrears_report_handler))
        .route("/reports/statement", post(statement_report_handler))
        .with_state(state)
}

/// Unwraps the JSON body or builds the 400 response for a rejected one.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(req)) => return Ok(req),
        Err(rejection) => rejection,
    };
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err((
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response())
}

fn error_response(correlation_id: Uuid, err: LedgerError, context: &'static str) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "{} failed",
        context
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn html_response(markup: Markup) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        markup.into_string(),
    )
        .into_response()
}

fn csv_response(body: String, filename: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    )
        .into_response()
}

/// The active tariff for `year`, or the latest active one when that year
/// has none. The statement flags the mismatch in its warnings.
fn resolve_tariff(config: &ConfigLoader, year: i32) -> LedgerResult<&Tariff> {
    config
        .tariff_for(year)
        .or_else(|err| config.latest_tariff().ok_or(err))
}

/// Handler for POST /statement.
///
/// Computes a guardian's ledger statement.
async fn statement_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing statement request");

    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    match build_statement(&state, &request) {
        Ok(statement) => {
            info!(
                correlation_id = %correlation_id,
                guardian_id = %statement.guardian_id,
                school_year = statement.school_year,
                total_paid = %statement.total_paid,
                arrears = statement.arrears.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Statement computed successfully"
            );
            json_response(StatusCode::OK, statement)
        }
        Err(err) => error_response(correlation_id, err, "Statement"),
    }
}

fn build_statement(
    state: &AppState,
    request: &StatementRequest,
) -> LedgerResult<LedgerStatement> {
    request.validate()?;
    let config = state.config();
    let today = state.today(request.as_of);
    let year = config.calendar().position(today).window().year();
    let tariff = resolve_tariff(config, year)?;
    calculate_statement(
        &request.guardian,
        &request.students,
        &request.payments,
        tariff,
        config.calendar(),
        today,
    )
}

/// Handler for POST /dashboard.
async fn dashboard_handler(
    State(state): State<AppState>,
    payload: Result<Json<LedgerSnapshot>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing dashboard request");

    let snapshot = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    match build_dashboard(&state, &snapshot) {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                guardians = snapshot.guardians.len(),
                payments = snapshot.payments.len(),
                compliance_rate = %summary.compliance_rate,
                duration_us = start_time.elapsed().as_micros(),
                "Dashboard summarized"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => error_response(correlation_id, err, "Dashboard"),
    }
}

fn build_dashboard(state: &AppState, snapshot: &LedgerSnapshot) -> LedgerResult<DashboardSummary> {
    snapshot.validate()?;
    let config = state.config();
    let today = state.today(snapshot.as_of);
    let year = config.calendar().position(today).window().year();
    let tariff = resolve_tariff(config, year)?;
    summarize_dashboard(
        &snapshot.guardians,
        &snapshot.students,
        &snapshot.payments,
        tariff,
        config.calendar(),
        today,
    )
}

/// Handler for POST /arrears.
async fn arrears_handler(
    State(state): State<AppState>,
    payload: Result<Json<LedgerSnapshot>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing arrears request");

    let snapshot = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if let Err(err) = snapshot.validate() {
        return error_response(correlation_id, err, "Arrears");
    }

    let list = list_overdue_guardians(
        &snapshot.guardians,
        &snapshot.students,
        &snapshot.payments,
        state.config().calendar(),
        state.today(snapshot.as_of),
    );
    info!(
        correlation_id = %correlation_id,
        in_session = list.in_session,
        in_arrears = list.guardians.len(),
        "Arrears listed"
    );
    json_response(StatusCode::OK, list)
}

/// Handler for POST /guardians.
///
/// Lists guardians with their derived monthly total, optionally filtered by
/// a name or email search.
async fn guardians_handler(
    State(state): State<AppState>,
    payload: Result<Json<GuardianListRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing guardian list request");

    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match build_guardian_list(&state, &request) {
        Ok(rows) => {
            info!(
                correlation_id = %correlation_id,
                listed = rows.len(),
                "Guardians listed"
            );
            json_response(StatusCode::OK, rows)
        }
        Err(err) => error_response(correlation_id, err, "Guardian list"),
    }
}

fn build_guardian_list(
    state: &AppState,
    request: &GuardianListRequest,
) -> LedgerResult<Vec<GuardianRow>> {
    request.validate()?;
    let config = state.config();
    let today = state.today(request.as_of);
    let year = config.calendar().position(today).window().year();
    let tariff = resolve_tariff(config, year)?;
    Ok(list_guardians(
        &request.guardians,
        &request.students,
        tariff,
        request.query.as_deref(),
    ))
}

/// Handler for POST /payments/review.
///
/// Applies an approve or reject decision to a pending payment and returns
/// the updated record.
async fn review_handler(payload: Result<Json<ReviewRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payment review");

    let ReviewRequest {
        mut payment,
        decision,
    } = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match payment.validate().and_then(|()| payment.review(&decision)) {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                payment_id = %payment.id,
                status = %payment.status,
                "Payment reviewed"
            );
            json_response(StatusCode::OK, payment)
        }
        Err(err) => error_response(correlation_id, err, "Review"),
    }
}

/// Handler for POST /payments/submit.
///
/// Validates a receipt form and returns the pending payment to store.
async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<PaymentSubmitRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payment submission");

    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let submission: PaymentSubmission = (&request).into();
    match submission.validate(state.config().uploads()) {
        Ok(validated) => {
            let payment = validated.into_payment(
                request.guardian_id,
                request.proof_url,
                request.submitted_at.unwrap_or_else(Utc::now),
            );
            info!(
                correlation_id = %correlation_id,
                guardian_id = %payment.guardian_id,
                month = %payment.month,
                amount = %payment.amount,
                "Payment submitted"
            );
            json_response(StatusCode::CREATED, payment)
        }
        Err(err) => error_response(correlation_id, err, "Submission"),
    }
}

/// Handler for POST /registration/validate.
///
/// Validates the sign-up form, derives the login and role, and claims the
/// requested codes against the supplied roster.
async fn registration_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing registration");

    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match register(&state, request) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                guardian_id = %outcome.guardian_id,
                claimed = outcome.claimed.len(),
                "Registration validated"
            );
            json_response(StatusCode::OK, outcome)
        }
        Err(err) => error_response(correlation_id, err, "Registration"),
    }
}

fn register(state: &AppState, request: RegistrationRequest) -> LedgerResult<RegistrationResponse> {
    let school = state.config().school();
    let codes = request.form.validate()?;
    let login = login_email(&request.form.phone, &school.phone_login_domain)?;
    let role = Role::for_email(&login, &school.admin_email);

    let guardian_id = Uuid::new_v4();
    let mut roster = request.students;
    let claimed: Vec<Student> = if roster.is_empty() {
        Vec::new()
    } else {
        let ids = claim_students(guardian_id, &codes, &mut roster)?;
        roster.into_iter().filter(|s| ids.contains(&s.id)).collect()
    };

    Ok(RegistrationResponse {
        guardian_id,
        login_email: login,
        role,
        codes,
        claimed,
    })
}

/// Handler for POST /roster/release.
///
/// Unassigns a student so another guardian can claim the code.
async fn release_handler(payload: Result<Json<ReleaseRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing student release");

    let ReleaseRequest { mut student } = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if let Err(err) = student.validate() {
        return error_response(correlation_id, err, "Release");
    }

    let previous_guardian_id = release_student(&mut student);
    info!(
        correlation_id = %correlation_id,
        code = %student.code,
        was_assigned = previous_guardian_id.is_some(),
        "Student released"
    );
    json_response(
        StatusCode::OK,
        ReleaseResponse {
            student,
            previous_guardian_id,
        },
    )
}

/// Handler for POST /roster/code.
///
/// Issues a code that is not on the roster yet.
async fn code_handler(payload: Result<Json<CodeRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let code = if request.sequential {
        next_sequential_code(&request.existing_codes)
    } else {
        let existing: HashSet<StudentCode> = request.existing_codes.into_iter().collect();
        unique_random_code(&existing)
    };
    match code {
        Ok(code) => {
            debug!(correlation_id = %correlation_id, code = %code, "Student code issued");
            json_response(StatusCode::OK, CodeResponse { code })
        }
        Err(err) => error_response(correlation_id, err, "Code generation"),
    }
}

/// Handler for POST /import/students.
async fn import_students_handler(
    payload: Result<Json<StudentImportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing student import");

    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match import_students(request.csv.as_bytes(), &request.existing_codes) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                imported = report.imported.len(),
                skipped = report.errors.len(),
                "Students imported"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => error_response(correlation_id, err, "Student import"),
    }
}

/// Handler for POST /import/payments.
async fn import_payments_handler(
    payload: Result<Json<PaymentImportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payment import");

    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match import_payments(request.csv.as_bytes(), &request.guardians, Utc::now()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                imported = report.imported.len(),
                skipped = report.errors.len(),
                "Payments imported"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => error_response(correlation_id, err, "Payment import"),
    }
}

/// Handler for POST /export/students.
async fn export_students_handler(
    payload: Result<Json<StudentExportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match students_to_csv(&request.students) {
        Ok(csv) => {
            debug!(correlation_id = %correlation_id, rows = request.students.len(), "Students exported");
            csv_response(csv, "attachment; filename=\"students.csv\"")
        }
        Err(err) => error_response(correlation_id, err, "Student export"),
    }
}

/// Handler for POST /export/payments.
async fn export_payments_handler(
    payload: Result<Json<PaymentExportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match payments_to_csv(&request.payments) {
        Ok(csv) => {
            debug!(correlation_id = %correlation_id, rows = request.payments.len(), "Payments exported");
            csv_response(csv, "attachment; filename=\"payments.csv\"")
        }
        Err(err) => error_response(correlation_id, err, "Payment export"),
    }
}

/// Handler for POST /reports/roster.
async fn roster_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let ctx = ReportContext::new(state.config().school(), state.today(request.as_of));
    debug!(correlation_id = %correlation_id, filter = ?request.filter, "Rendering roster report");
    html_response(render_roster(
        &ctx,
        &request.students,
        &request.guardians,
        request.filter,
    ))
}

/// Handler for POST /reports/payments.
async fn payments_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<PaymentReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if let Err(err) = request.validate() {
        return error_response(correlation_id, err, "Payment report");
    }

    let ctx = ReportContext::new(state.config().school(), state.today(request.as_of));
    debug!(correlation_id = %correlation_id, kind = ?request.kind, "Rendering payment report");
    html_response(render_payments(
        &ctx,
        &request.guardians,
        &request.payments,
        request.kind,
    ))
}

/// Handler for POST /reports/arrears.
async fn arrears_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<LedgerSnapshot>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let snapshot = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if let Err(err) = snapshot.validate() {
        return error_response(correlation_id, err, "Arrears report");
    }

    let config = state.config();
    let today = state.today(snapshot.as_of);
    let list = list_overdue_guardians(
        &snapshot.guardians,
        &snapshot.students,
        &snapshot.payments,
        config.calendar(),
        today,
    );
    debug!(correlation_id = %correlation_id, in_arrears = list.guardians.len(), "Rendering arrears report");
    html_response(render_arrears(&ReportContext::new(config.school(), today), &list))
}

/// Handler for POST /reports/statement.
async fn statement_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(req) => req,
        Err(response) => return response,
    };

    match build_statement(&state, &request) {
        Ok(statement) => {
            debug!(correlation_id = %correlation_id, guardian_id = %statement.guardian_id, "Rendering statement report");
            let ctx = ReportContext::new(state.config().school(), statement.as_of);
            html_response(render_statement(
                &ctx,
                &request.guardian,
                &request.students,
                &request.payments,
                &statement,
            ))
        }
        Err(err) => error_response(correlation_id, err, "Statement report"),
    }
}
