use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{PluckerDetail, Record};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PluckerDetailRequest {
    #[validate(length(min = 1, message = "Plucker id is required"))]
    pub plucker_id: String,

    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: f64,
}

impl From<PluckerDetailRequest> for PluckerDetail {
    fn from(detail: PluckerDetailRequest) -> Self {
        Self {
            plucker_id: detail.plucker_id,
            weight: detail.weight,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub date: DateTime<Utc>,

    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub total_weight: f64,

    #[validate(range(min = 0, message = "Plucker count must not be negative"))]
    pub plucker_count: i32,

    #[validate(range(min = 0.0, message = "Average price must not be negative"))]
    pub average_price: f64,

    #[validate(nested)]
    #[serde(default)]
    pub plucker_details: Vec<PluckerDetailRequest>,
}

/// Partial update; omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    pub date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub total_weight: Option<f64>,

    #[validate(range(min = 0, message = "Plucker count must not be negative"))]
    pub plucker_count: Option<i32>,

    #[validate(range(min = 0.0, message = "Average price must not be negative"))]
    pub average_price: Option<f64>,

    #[validate(nested)]
    pub plucker_details: Option<Vec<PluckerDetailRequest>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluckerDetailResponse {
    pub plucker_id: String,
    pub weight: f64,
}

impl From<PluckerDetail> for PluckerDetailResponse {
    fn from(detail: PluckerDetail) -> Self {
        Self {
            plucker_id: detail.plucker_id,
            weight: detail.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: String,
    pub date: String,
    pub total_weight: f64,
    pub plucker_count: i32,
    pub average_price: f64,
    pub plucker_details: Vec<PluckerDetailResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            date: record.date.to_chrono().to_rfc3339(),
            total_weight: record.total_weight,
            plucker_count: record.plucker_count,
            average_price: record.average_price,
            plucker_details: record
                .plucker_details
                .into_iter()
                .map(PluckerDetailResponse::from)
                .collect(),
            created_at: record.created_at.to_chrono().to_rfc3339(),
            updated_at: record.updated_at.to_chrono().to_rfc3339(),
        }
    }
}
