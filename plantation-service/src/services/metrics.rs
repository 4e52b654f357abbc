use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static RECORDS_CREATED_TOTAL: OnceLock<IntCounter> = OnceLock::new();
pub static PAYMENTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static REPORTS_GENERATED_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Install the service counters. Safe to call more than once; later calls
/// are no-ops so test harnesses can spawn several applications in-process.
pub fn init_metrics() {
    let registry = Registry::new();

    let records_counter = IntCounter::with_opts(Opts::new(
        "plantation_records_created_total",
        "Collection records created",
    ))
    .expect("Failed to create plantation_records_created_total metric");

    let payments_counter = IntCounterVec::new(
        Opts::new(
            "plantation_payments_total",
            "Payment operations by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create plantation_payments_total metric");

    let reports_counter = IntCounter::with_opts(Opts::new(
        "plantation_reports_generated_total",
        "Plucker reports generated",
    ))
    .expect("Failed to create plantation_reports_generated_total metric");

    registry
        .register(Box::new(records_counter.clone()))
        .expect("Failed to register plantation_records_created_total");
    registry
        .register(Box::new(payments_counter.clone()))
        .expect("Failed to register plantation_payments_total");
    registry
        .register(Box::new(reports_counter.clone()))
        .expect("Failed to register plantation_reports_generated_total");

    if PROMETHEUS_REGISTRY.set(registry).is_err() {
        return;
    }
    let _ = RECORDS_CREATED_TOTAL.set(records_counter);
    let _ = PAYMENTS_TOTAL.set(payments_counter);
    let _ = REPORTS_GENERATED_TOTAL.set(reports_counter);
}

pub fn get_metrics() -> String {
    let Some(registry) = PROMETHEUS_REGISTRY.get() else {
        return "# Metrics not initialized\n".to_string();
    };

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_else(|_| "# Metrics encoding failed\n".to_string())
}

pub fn record_created() {
    if let Some(counter) = RECORDS_CREATED_TOTAL.get() {
        counter.inc();
    }
}

pub fn payment_recorded(outcome: &str) {
    if let Some(counter) = PAYMENTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn report_generated() {
    if let Some(counter) = REPORTS_GENERATED_TOTAL.get() {
        counter.inc();
    }
}
