//! Derives a draft payment from collection records in a date range.
//!
//! The routine is a pure fold over already-loaded records so it can be
//! exercised without a database; the handler supplies records fetched for
//! the inclusive calendar range.

use chrono::NaiveDate;
use mongodb::bson::DateTime;
use std::collections::BTreeMap;

use crate::models::{PaymentStatus, Record};

/// One plucker's accumulated line in a draft payment.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDetail {
    pub plucker_id: String,
    pub amount: f64,
    pub record_ids: Vec<String>,
}

/// A payment proposal derived from records; not persisted until a caller
/// stores it through the payment endpoints.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub period: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PaymentStatus,
    pub plucker_count: usize,
    pub total_amount: f64,
    pub details: Vec<DraftDetail>,
}

pub fn period_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

/// The UTC instant bounds of the inclusive calendar range [start, end]:
/// midnight on the start date through the last millisecond of the end date.
pub fn day_range_utc(start: NaiveDate, end: NaiveDate) -> (DateTime, DateTime) {
    let start_instant = start
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    let end_instant = end
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is a valid time")
        .and_utc();
    (
        DateTime::from_chrono(start_instant),
        DateTime::from_chrono(end_instant),
    )
}

/// Group record detail lines by plucker, summing weight x the record's
/// average price into per-plucker amounts and collecting the contributing
/// record ids. A plucker listed twice in one record's details simply
/// accumulates both lines. No matching records is a valid, zeroed draft.
pub fn aggregate_records(records: &[Record], start: NaiveDate, end: NaiveDate) -> PaymentDraft {
    let mut by_plucker: BTreeMap<String, DraftDetail> = BTreeMap::new();
    let mut total_amount = 0.0;

    for record in records {
        for detail in &record.plucker_details {
            let amount = detail.weight * record.average_price;
            let entry = by_plucker
                .entry(detail.plucker_id.clone())
                .or_insert_with(|| DraftDetail {
                    plucker_id: detail.plucker_id.clone(),
                    amount: 0.0,
                    record_ids: Vec::new(),
                });
            entry.amount += amount;
            entry.record_ids.push(record.id.clone());
            total_amount += amount;
        }
    }

    PaymentDraft {
        period: period_label(start, end),
        start_date: start,
        end_date: end,
        status: PaymentStatus::Pending,
        plucker_count: by_plucker.len(),
        total_amount,
        details: by_plucker.into_values().collect(),
    }
}
