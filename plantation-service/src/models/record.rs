use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One plucker's share of a collection event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluckerDetail {
    pub plucker_id: String,
    pub weight: f64,
}

/// One day's aggregate collection event, broken down per plucker.
///
/// `total_weight` and `plucker_count` are caller-supplied; they are not
/// recomputed from `plucker_details` server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: DateTime,
    pub total_weight: f64,
    pub plucker_count: i32,
    pub average_price: f64,
    pub plucker_details: Vec<PluckerDetail>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Record {
    pub fn new(
        date: DateTime,
        total_weight: f64,
        plucker_count: i32,
        average_price: f64,
        plucker_details: Vec<PluckerDetail>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            total_weight,
            plucker_count,
            average_price,
            plucker_details,
            created_at: now,
            updated_at: now,
        }
    }
}
