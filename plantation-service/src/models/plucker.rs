use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluckerStatus {
    Active,
    Inactive,
}

impl PluckerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluckerStatus::Active => "active",
            PluckerStatus::Inactive => "inactive",
        }
    }
}

/// A tea-leaf collector tracked by the estate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plucker {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub join_date: DateTime,
    pub status: PluckerStatus,
    /// Running total of collected weight in kilograms. Maintained by the
    /// record create/update/delete paths, not recomputed from records.
    pub collection: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Plucker {
    pub fn new(
        name: String,
        phone: String,
        address: Option<String>,
        join_date: Option<DateTime>,
        status: Option<PluckerStatus>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            address: address.unwrap_or_default(),
            join_date: join_date.unwrap_or(now),
            status: status.unwrap_or(PluckerStatus::Active),
            collection: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}
