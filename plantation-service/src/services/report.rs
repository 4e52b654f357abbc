//! Plucker performance report: one row per plucker over a date range.

use chrono::Utc;

use crate::models::{Payment, Plucker, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub total_collection: f64,
    pub total_earnings: f64,
    pub status: String,
}

pub fn report_file_name() -> String {
    format!("plucker-report-{}.pdf", Utc::now().timestamp_millis())
}

/// Cross-reference loaded records and payments per plucker.
///
/// Every plucker gets a row; pluckers with no activity in the loaded data
/// keep zero totals. Callers are expected to have filtered `records` and
/// `payments` to the target date range already.
pub fn build_report_rows(
    pluckers: &[Plucker],
    records: &[Record],
    payments: &[Payment],
) -> Vec<ReportRow> {
    pluckers
        .iter()
        .map(|plucker| {
            let total_collection = records
                .iter()
                .flat_map(|record| &record.plucker_details)
                .filter(|detail| detail.plucker_id == plucker.id)
                .map(|detail| detail.weight)
                .sum();

            let total_earnings = payments
                .iter()
                .flat_map(|payment| &payment.details)
                .filter(|detail| detail.plucker_id == plucker.id)
                .map(|detail| detail.amount)
                .sum();

            ReportRow {
                name: plucker.name.clone(),
                total_collection,
                total_earnings,
                status: plucker.status.as_str().to_string(),
            }
        })
        .collect()
}
