use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Plucker, PluckerStatus};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePluckerRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    pub address: Option<String>,
    pub join_date: Option<DateTime<Utc>>,
    pub status: Option<PluckerStatus>,
}

/// Partial update; omitted fields are left untouched. `collection` may be
/// overwritten directly, which is how callers correct a drifted total.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePluckerRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    pub phone: Option<String>,

    pub address: Option<String>,
    pub join_date: Option<DateTime<Utc>>,
    pub status: Option<PluckerStatus>,

    #[validate(range(min = 0.0, message = "Collection must not be negative"))]
    pub collection: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TopPluckersParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluckerResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub join_date: String,
    pub status: PluckerStatus,
    pub collection: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Plucker> for PluckerResponse {
    fn from(plucker: Plucker) -> Self {
        Self {
            id: plucker.id,
            name: plucker.name,
            phone: plucker.phone,
            address: plucker.address,
            join_date: plucker.join_date.to_chrono().to_rfc3339(),
            status: plucker.status,
            collection: plucker.collection,
            created_at: plucker.created_at.to_chrono().to_rfc3339(),
            updated_at: plucker.updated_at.to_chrono().to_rfc3339(),
        }
    }
}
