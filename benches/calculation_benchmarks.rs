//! Performance benchmarks for the tuition ledger.
//!
//! This benchmark suite covers:
//! - A single statement through the HTTP router
//! - Statement calculation as payment history grows
//! - Dashboard and arrears aggregation over 100 and 1000 guardians
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use uuid::Uuid;

use tuition_ledger::api::{AppState, create_router};
use tuition_ledger::calculation::{
    calculate_statement, list_overdue_guardians, summarize_dashboard,
};
use tuition_ledger::config::{ConfigLoader, SchoolCalendar};
use tuition_ledger::models::{
    Guardian, GuardianStatus, Level, Payment, PaymentStatus, Student, StudentCode, Tariff,
    YearMonth,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/school").expect("Failed to load config");
    AppState::new(config)
}

fn create_tariff() -> Tariff {
    Tariff {
        year: 2026,
        primary: Decimal::new(350, 0),
        secondary: Decimal::new(400, 0),
        active: true,
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()
}

fn create_guardian(i: usize) -> Guardian {
    Guardian {
        id: Uuid::new_v4(),
        full_name: format!("Apoderado Numero {}", i),
        phone: Some(format!("7{:07}", i)),
        email: None,
        status: GuardianStatus::Active,
        registered_at: None,
    }
}

fn create_children(guardian: &Guardian, count: usize, offset: usize) -> Vec<Student> {
    (0..count)
        .map(|j| {
            let code: StudentCode = format!("{:04}", offset + j).parse().unwrap();
            let level = if j % 2 == 0 { Level::Primary } else { Level::Secondary };
            let mut student = Student::new(code, "Estudiante Prueba", level);
            student.guardian_id = Some(guardian.id);
            student
        })
        .collect()
}

/// One payment per school month, cycling Feb to Nov, every fifth pending.
fn create_payments(guardian: &Guardian, count: usize) -> Vec<Payment> {
    (0..count)
        .map(|k| {
            let month = YearMonth::new(2026, 2 + (k % 10) as u32).unwrap();
            Payment {
                id: Uuid::new_v4(),
                guardian_id: guardian.id,
                month,
                amount: Decimal::new(35000, 2),
                status: if k % 5 == 4 {
                    PaymentStatus::Pending
                } else {
                    PaymentStatus::Approved
                },
                proof_url: String::new(),
                submitted_at: Utc.with_ymd_and_hms(2026, month.month(), 5, 10, 0, 0).unwrap(),
                review_note: None,
            }
        })
        .collect()
}

struct School {
    guardians: Vec<Guardian>,
    students: Vec<Student>,
    payments: Vec<Payment>,
}

fn create_school(guardian_count: usize) -> School {
    let mut school = School {
        guardians: Vec::with_capacity(guardian_count),
        students: Vec::new(),
        payments: Vec::new(),
    };
    for i in 0..guardian_count {
        let guardian = create_guardian(i);
        school
            .students
            .extend(create_children(&guardian, 1 + i % 3, school.students.len()));
        school.payments.extend(create_payments(&guardian, i % 8));
        school.guardians.push(guardian);
    }
    school
}

/// Benchmark: One statement request through the router.
fn bench_statement_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());

    let guardian = create_guardian(1);
    let body = serde_json::json!({
        "guardian": guardian,
        "students": create_children(&guardian, 2, 0),
        "payments": create_payments(&guardian, 6),
        "as_of": as_of(),
    })
    .to_string();

    c.bench_function("statement_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/statement")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Statement calculation as the payment history grows.
fn bench_statement_scaling(c: &mut Criterion) {
    let tariff = create_tariff();
    let calendar = SchoolCalendar::default();
    let guardian = create_guardian(1);
    let children = create_children(&guardian, 3, 0);

    let mut group = c.benchmark_group("statement_scaling");
    for payment_count in [1, 10, 50, 200].iter() {
        let payments = create_payments(&guardian, *payment_count);
        group.throughput(Throughput::Elements(*payment_count as u64));
        group.bench_with_input(
            BenchmarkId::new("payments", payment_count),
            payment_count,
            |b, _| {
                b.iter(|| {
                    calculate_statement(
                        black_box(&guardian),
                        black_box(&children),
                        black_box(&payments),
                        &tariff,
                        &calendar,
                        as_of(),
                    )
                })
            },
        );
    }
    group.finish();
}

/// Benchmark: Dashboard aggregation for 100 and 1000 guardians.
fn bench_dashboard(c: &mut Criterion) {
    let tariff = create_tariff();
    let calendar = SchoolCalendar::default();

    let mut group = c.benchmark_group("dashboard");
    for guardian_count in [100, 1000].iter() {
        let school = create_school(*guardian_count);
        if *guardian_count >= 1000 {
            group.sample_size(10);
        }
        group.throughput(Throughput::Elements(*guardian_count as u64));
        group.bench_with_input(
            BenchmarkId::new("guardians", guardian_count),
            guardian_count,
            |b, _| {
                b.iter(|| {
                    summarize_dashboard(
                        black_box(&school.guardians),
                        black_box(&school.students),
                        black_box(&school.payments),
                        &tariff,
                        &calendar,
                        as_of(),
                    )
                })
            },
        );
    }
    group.finish();
}

/// Benchmark: Arrears list for 1000 guardians.
fn bench_arrears_list(c: &mut Criterion) {
    let calendar = SchoolCalendar::default();
    let school = create_school(1000);

    let mut group = c.benchmark_group("arrears");
    group.throughput(Throughput::Elements(1000));
    group.sample_size(10);
    group.bench_function("guardians_1000", |b| {
        b.iter(|| {
            list_overdue_guardians(
                black_box(&school.guardians),
                black_box(&school.students),
                black_box(&school.payments),
                &calendar,
                as_of(),
            )
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_statement_request,
    bench_statement_scaling,
    bench_dashboard,
    bench_arrears_list,
);
criterion_main!(benches);
