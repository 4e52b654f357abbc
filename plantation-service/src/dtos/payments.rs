use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Payment, PaymentDetail, PaymentStatus};
use crate::services::aggregation::{DraftDetail, PaymentDraft};

use super::records::RecordResponse;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailRequest {
    #[serde(rename = "plucker")]
    #[validate(length(min = 1, message = "Plucker id is required"))]
    pub plucker_id: String,

    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: f64,

    #[serde(rename = "records", default)]
    pub record_ids: Vec<String>,
}

impl From<PaymentDetailRequest> for PaymentDetail {
    fn from(detail: PaymentDetailRequest) -> Self {
        Self {
            plucker_id: detail.plucker_id,
            amount: detail.amount,
            record_ids: detail.record_ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, message = "Period is required"))]
    pub period: String,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,

    #[validate(range(min = 0.0, message = "Total amount must not be negative"))]
    pub total_amount: f64,

    pub date: Option<chrono::DateTime<chrono::Utc>>,

    #[validate(length(min = 1, message = "Details are required"), nested)]
    pub details: Vec<PaymentDetailRequest>,
}

/// Partial update; omitted fields are left untouched. Setting `details`
/// also recomputes `pluckerCount`. This is the only path that can move a
/// payment into the `cancelled` status.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    #[validate(length(min = 1, message = "Period cannot be empty"))]
    pub period: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,

    #[validate(range(min = 0.0, message = "Total amount must not be negative"))]
    pub total_amount: Option<f64>,

    pub date: Option<chrono::DateTime<chrono::Utc>>,

    #[validate(nested)]
    pub details: Option<Vec<PaymentDetailRequest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePaymentRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListParams {
    pub status: Option<PaymentStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// The plucker fields exposed on populated payment detail lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluckerSummary {
    pub id: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedPaymentDetail {
    /// None when the referenced plucker has been deleted since.
    pub plucker: Option<PluckerSummary>,
    pub amount: f64,
    pub records: Vec<RecordResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub period: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: PaymentStatus,
    pub plucker_count: i32,
    pub total_amount: f64,
    pub date: String,
    pub details: Vec<PopulatedPaymentDetail>,
    pub created_at: String,
    pub updated_at: String,
}

impl PaymentResponse {
    /// Header fields only; `details` are populated separately at read time.
    pub fn from_payment(payment: &Payment, details: Vec<PopulatedPaymentDetail>) -> Self {
        Self {
            id: payment.id.clone(),
            period: payment.period.clone(),
            start_date: payment
                .start_date
                .map(|d| d.to_chrono().to_rfc3339()),
            end_date: payment.end_date.map(|d| d.to_chrono().to_rfc3339()),
            status: payment.status,
            plucker_count: payment.plucker_count,
            total_amount: payment.total_amount,
            date: payment.date.to_chrono().to_rfc3339(),
            details,
            created_at: payment.created_at.to_chrono().to_rfc3339(),
            updated_at: payment.updated_at.to_chrono().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraftDetail {
    pub plucker: String,
    pub amount: f64,
    pub records: Vec<String>,
}

impl From<DraftDetail> for PaymentDraftDetail {
    fn from(detail: DraftDetail) -> Self {
        Self {
            plucker: detail.plucker_id,
            amount: detail.amount,
            records: detail.record_ids,
        }
    }
}

/// The aggregator's output: a payment proposal that has not been persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraftResponse {
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub status: PaymentStatus,
    pub plucker_count: usize,
    pub total_amount: f64,
    pub details: Vec<PaymentDraftDetail>,
}

impl From<PaymentDraft> for PaymentDraftResponse {
    fn from(draft: PaymentDraft) -> Self {
        Self {
            period: draft.period,
            start_date: draft.start_date.format("%Y-%m-%d").to_string(),
            end_date: draft.end_date.format("%Y-%m-%d").to_string(),
            status: draft.status,
            plucker_count: draft.plucker_count,
            total_amount: draft.total_amount,
            details: draft
                .details
                .into_iter()
                .map(PaymentDraftDetail::from)
                .collect(),
        }
    }
}
