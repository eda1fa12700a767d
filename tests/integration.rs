//! Integration tests for the Leave Accrual & Ledger Engine.
//!
//! This test suite drives the engine end to end over the in-memory stores
//! and the default configuration:
//! - Duration of leave requests against the roster
//! - Monthly accrual and its idempotence
//! - Carryover roll-forward across year boundaries
//! - Booking leave and manual adjustments
//! - Bucket deduction and cache sync
//! - Error cases

use std::sync::Arc;
use std::thread;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::json;

use leave_engine::calculation::{calculate_monthly_accrual_minutes, summarize};
use leave_engine::config::ConfigLoader;
use leave_engine::engine::{FixedClock, LeaveEngine};
use leave_engine::error::EngineError;
use leave_engine::models::{
    BalanceSnapshot, EmployeeLeaveConfig, Entitlement, EntryType, LeaveRequest, WorkingDays,
};
use leave_engine::store::{
    EmployeeDirectory, InMemoryEmployeeDirectory, InMemoryLedgerStore, LedgerQuery, LedgerStore,
};

// =============================================================================
// Test Helpers
// =============================================================================

struct TestEngine {
    engine: LeaveEngine,
    employees: Arc<InMemoryEmployeeDirectory>,
    ledger: Arc<InMemoryLedgerStore>,
}

fn make_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn make_time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn create_engine(today: &str, employees: Vec<EmployeeLeaveConfig>) -> TestEngine {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let policy = config.deduction_policy().clone();

    let directory = Arc::new(InMemoryEmployeeDirectory::new());
    for employee in employees {
        directory.upsert_employee(employee).unwrap();
    }
    let ledger = Arc::new(InMemoryLedgerStore::new());

    let engine = LeaveEngine::new(ledger.clone(), directory.clone(), Arc::new(config))
        .with_clock(FixedClock(make_date(today)))
        .with_default_policy(policy);

    TestEngine {
        engine,
        employees: directory,
        ledger,
    }
}

fn full_timer(id: &str) -> EmployeeLeaveConfig {
    EmployeeLeaveConfig::new(id, Entitlement::days(Decimal::from(24)))
}

fn whole_days(id: &str, employee_id: &str, start: &str, end: &str) -> LeaveRequest {
    LeaveRequest::whole_days(id, employee_id, make_date(start), make_date(end))
}

fn assert_cache_matches_ledger(t: &TestEngine, employee_id: &str) {
    let cached = t.employees.load_balance(employee_id).unwrap();
    let summary = t.engine.get_balance_summary(employee_id).unwrap();
    assert_eq!(
        cached.total_minutes(),
        summary.total,
        "cached buckets {:?} drifted from ledger total {}",
        cached,
        summary.total
    );
    assert_eq!(cached.carryover_minutes, summary.carryover);
}

// =============================================================================
// SECTION 1: Duration
// =============================================================================

#[test]
fn test_duration_three_weekdays_with_break() {
    let t = create_engine("2026-02-01", vec![full_timer("emp_001")]);
    let request = whole_days("req_001", "emp_001", "2026-02-02", "2026-02-04");
    assert_eq!(t.engine.calculate_duration(&request).unwrap(), 3 * (540 - 30));
}

#[test]
fn test_duration_weekend_only_is_zero() {
    let t = create_engine("2026-02-01", vec![full_timer("emp_001")]);
    let request = whole_days("req_001", "emp_001", "2026-02-07", "2026-02-08");
    assert_eq!(t.engine.calculate_duration(&request).unwrap(), 0);
}

#[test]
fn test_duration_respects_employee_working_days() {
    let mut part_timer = full_timer("emp_002");
    part_timer.working_days = WorkingDays::parse(&["ma", "wo", "vr"]).unwrap();
    let t = create_engine("2026-02-01", vec![part_timer]);

    let request = whole_days("req_001", "emp_002", "2026-02-02", "2026-02-08");
    assert_eq!(t.engine.calculate_duration(&request).unwrap(), 3 * 510);
}

#[test]
fn test_duration_partial_edges_on_multi_day_request() {
    let t = create_engine("2026-02-01", vec![full_timer("emp_001")]);
    // Mon from 13:00, Tue full, Wed until 10:00
    let request = whole_days("req_001", "emp_001", "2026-02-02", "2026-02-04")
        .with_times(make_time("13:00"), make_time("10:00"));
    assert_eq!(t.engine.calculate_duration(&request).unwrap(), 240 + 510 + 120);
}

#[test]
fn test_duration_single_day_outside_roster_is_clamped() {
    let t = create_engine("2026-02-01", vec![full_timer("emp_001")]);
    let wide = whole_days("req_001", "emp_001", "2026-02-03", "2026-02-03")
        .with_times(make_time("06:00"), make_time("20:00"));
    let exact = whole_days("req_002", "emp_001", "2026-02-03", "2026-02-03")
        .with_times(make_time("08:00"), make_time("17:00"));
    assert_eq!(
        t.engine.calculate_duration(&wide).unwrap(),
        t.engine.calculate_duration(&exact).unwrap()
    );
}

#[test]
fn test_duration_rejects_reversed_range_and_lone_time() {
    let t = create_engine("2026-02-01", vec![full_timer("emp_001")]);

    let reversed = whole_days("req_001", "emp_001", "2026-02-04", "2026-02-02");
    assert!(matches!(
        t.engine.calculate_duration(&reversed),
        Err(EngineError::InvalidRange { .. })
    ));

    let mut lone = whole_days("req_002", "emp_001", "2026-02-02", "2026-02-02");
    lone.start_time = Some(make_time("09:00"));
    assert!(matches!(
        t.engine.calculate_duration(&lone),
        Err(EngineError::InvalidRange { .. })
    ));
}

// =============================================================================
// SECTION 2: Accrual
// =============================================================================

#[test]
fn test_monthly_accrual_even_division() {
    assert_eq!(calculate_monthly_accrual_minutes(11520, 1).unwrap(), 960);
    assert_eq!(calculate_monthly_accrual_minutes(11520, 12).unwrap(), 960);
}

#[test]
fn test_accrual_idempotent_over_many_calls() {
    let t = create_engine("2026-10-19", vec![full_timer("emp_001")]);

    t.engine.ensure_accrual_up_to_date("emp_001", 2026).unwrap();
    let entries = t.ledger.query("emp_001", &LedgerQuery::new()).unwrap();
    let total = t.engine.get_balance_summary("emp_001").unwrap().total;

    for _ in 0..3 {
        t.engine.ensure_accrual_up_to_date("emp_001", 2026).unwrap();
    }

    assert_eq!(t.ledger.query("emp_001", &LedgerQuery::new()).unwrap(), entries);
    assert_eq!(t.engine.get_balance_summary("emp_001").unwrap().total, total);
    assert_eq!(total, 10 * 960);
    assert_cache_matches_ledger(&t, "emp_001");
}

#[test]
fn test_accrual_hours_entitlement_uneven() {
    let mut employee = full_timer("emp_003");
    employee.annual_entitlement = Entitlement::hours(Decimal::new(1667, 1));
    let t = create_engine("2027-01-05", vec![employee]);

    t.engine.ensure_accrual_up_to_date("emp_003", 2026).unwrap();
    let accrued = t.engine.get_year_summary("emp_003", 2026).unwrap().accrued;
    assert_eq!(accrued, 10002);
}

#[test]
fn test_accrual_from_json_config() {
    let employee: EmployeeLeaveConfig = serde_json::from_value(json!({
        "employee_id": "emp_json",
        "hours_per_day": "7.5",
        "annual_entitlement": { "amount": "20", "unit": "days" },
        "employment_start_date": "2026-04-01",
        "working_days": ["ma", "di", "wo", "do"],
        "opening_balance": { "vacation_days": "1" }
    }))
    .unwrap();
    let t = create_engine("2026-06-30", vec![employee]);

    let report = t.engine.ensure_accrual_up_to_date("emp_json", 2026).unwrap();
    assert!(report.opening_seeded);
    assert_eq!(report.months_written, vec![4, 5, 6]);

    // 20 days x 7.5h = 9000 minutes a year, 750 a month; opening 450
    let summary = t.engine.get_balance_summary("emp_json").unwrap();
    assert_eq!(summary.accrued, 3 * 750);
    assert_eq!(summary.adjustments, 450);

    // statutory share is 4 weeks x 4 days x 7.5h = 7200 minutes
    let balance = t.employees.load_balance("emp_json").unwrap();
    assert_eq!(balance.legal_minutes, 3 * 750 + 450);
    assert_eq!(balance.non_legal_minutes, 0);
}

#[test]
fn test_accrual_unknown_employee() {
    let t = create_engine("2026-02-01", vec![]);
    assert!(matches!(
        t.engine.ensure_accrual_up_to_date("emp_404", 2026),
        Err(EngineError::EmployeeNotFound { .. })
    ));
    assert_eq!(t.ledger.count("emp_404").unwrap(), 0);
}

// =============================================================================
// SECTION 3: Carryover Roll-Forward
// =============================================================================

#[test]
fn test_year_boundary_rolls_closing_balance_forward() {
    let t = create_engine("2026-01-10", vec![full_timer("emp_001")]);
    t.engine.ensure_accrual_up_to_date("emp_001", 2025).unwrap();
    t.engine
        .record_leave_taken(&whole_days("req_dec", "emp_001", "2025-12-22", "2025-12-24"), "mgr")
        .unwrap();

    let closing_2025 = t.engine.get_year_summary("emp_001", 2025).unwrap();
    assert_eq!(closing_2025.total, 11520 - 1530);

    let report = t.engine.ensure_accrual_up_to_date("emp_001", 2026).unwrap();
    assert!(report.carryover_written);
    assert_eq!(report.months_written, vec![1]);

    let summary = t.engine.get_balance_summary("emp_001").unwrap();
    assert_eq!(summary.carryover, 11520 - 1530);
    assert_eq!(summary.accrued, 960);
    assert_eq!(summary.taken, 0);
    assert_eq!(summary.total, 11520 - 1530 + 960);
    assert_cache_matches_ledger(&t, "emp_001");
}

#[test]
fn test_december_leave_booked_after_roll_forward_is_charged() {
    let t = create_engine("2026-01-10", vec![full_timer("emp_001")]);
    t.engine.ensure_accrual_up_to_date("emp_001", 2025).unwrap();
    t.engine.ensure_accrual_up_to_date("emp_001", 2026).unwrap();
    assert_eq!(t.engine.get_balance_summary("emp_001").unwrap().total, 12480);

    let booking = t
        .engine
        .record_leave_taken(&whole_days("req_late", "emp_001", "2025-12-29", "2025-12-31"), "mgr")
        .unwrap();
    assert_eq!(booking.minutes, 1530);
    assert_eq!(booking.balance.total_minutes(), 12480 - 1530);

    let summary = t.engine.get_balance_summary("emp_001").unwrap();
    assert_eq!(summary.taken, -1530);
    assert_eq!(summary.total, 10950);
    assert_cache_matches_ledger(&t, "emp_001");

    // the next roll-forward carries the charge along
    let closing_2026 = t.engine.get_year_summary("emp_001", 2026).unwrap();
    assert_eq!(closing_2026.total, 10950);
}

#[test]
fn test_refresh_balance_is_lazy_roll_forward() {
    let t = create_engine("2026-03-01", vec![full_timer("emp_001")]);
    let balance = t.engine.refresh_balance("emp_001").unwrap();
    assert_eq!(balance.total_minutes(), 3 * 960);

    let carryovers = t
        .ledger
        .query("emp_001", &LedgerQuery::new().entry_type(EntryType::Carryover))
        .unwrap();
    assert_eq!(carryovers.len(), 1);
    assert_eq!(carryovers[0].period_key.as_deref(), Some("CARRYOVER-2026"));
}

// =============================================================================
// SECTION 4: Leave Taken, Adjustments and Deduction
// =============================================================================

#[test]
fn test_booking_leave_keeps_cache_in_step() {
    let t = create_engine("2026-06-15", vec![full_timer("emp_001")]);
    t.engine.refresh_balance("emp_001").unwrap();

    let booking = t
        .engine
        .record_leave_taken(&whole_days("req_001", "emp_001", "2026-06-01", "2026-06-05"), "mgr")
        .unwrap();
    assert_eq!(booking.minutes, 5 * 510);
    assert_eq!(booking.entry.period_key.as_deref(), Some("2026-06"));

    t.engine
        .record_manual_adjustment("emp_001", 240, "overtime compensation", "hr_admin")
        .unwrap();

    let summary = t.engine.get_balance_summary("emp_001").unwrap();
    assert_eq!(summary.accrued, 6 * 960);
    assert_eq!(summary.taken, -5 * 510);
    assert_eq!(summary.adjustments, 240);
    assert_cache_matches_ledger(&t, "emp_001");
}

#[test]
fn test_deduction_ordering_with_configured_policy() {
    let t = create_engine("2026-06-15", vec![full_timer("emp_001")]);
    t.employees
        .store_balance(
            "emp_001",
            &BalanceSnapshot {
                legal_minutes: 0,
                non_legal_minutes: 30,
                carryover_minutes: 60,
            },
        )
        .unwrap();

    let outcome = t.engine.deduct_with_default_policy("emp_001", 120).unwrap();
    assert_eq!(outcome.balance.carryover_minutes, 0);
    assert_eq!(outcome.balance.non_legal_minutes, 0);
    assert_eq!(outcome.balance.legal_minutes, -30);
    assert_eq!(outcome.unapplied_hours, Decimal::ZERO);
}

#[test]
fn test_concurrent_bookings_for_one_employee() {
    let t = create_engine("2026-06-15", vec![full_timer("emp_001")]);
    t.engine.refresh_balance("emp_001").unwrap();
    let engine = Arc::new(t.engine);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let day = format!("2026-05-{:02}", 4 + i % 5);
                let request = LeaveRequest::whole_days(
                    format!("req_{}", i),
                    "emp_001",
                    make_date(&day),
                    make_date(&day),
                );
                engine.record_leave_taken(&request, "mgr").unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let entries = t.ledger.query("emp_001", &LedgerQuery::new()).unwrap();
    let summary = summarize(&entries);
    assert_eq!(summary.taken, -8 * 510);

    let cached = t.employees.load_balance("emp_001").unwrap();
    assert_eq!(cached.total_minutes(), 6 * 960 - 8 * 510);
}

#[test]
fn test_unknown_employee_paths() {
    let t = create_engine("2026-06-15", vec![]);
    let request = whole_days("req_001", "emp_404", "2026-06-01", "2026-06-01");

    assert!(matches!(
        t.engine.record_leave_taken(&request, "mgr"),
        Err(EngineError::EmployeeNotFound { .. })
    ));
    assert!(matches!(
        t.engine.deduct_with_default_policy("emp_404", 60),
        Err(EngineError::EmployeeNotFound { .. })
    ));
    assert!(matches!(
        t.engine.ensure_carryover_from_previous_year("emp_404", 2026),
        Err(EngineError::EmployeeNotFound { .. })
    ));
    assert_eq!(t.ledger.count("emp_404").unwrap(), 0);
}
