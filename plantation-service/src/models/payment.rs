use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

/// One plucker's line in a payment batch: the amount owed and the
/// collection records it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub plucker_id: String,
    pub amount: f64,
    pub record_ids: Vec<String>,
}

/// A batch of computed earnings for one or more pluckers over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub period: String,
    pub start_date: Option<DateTime>,
    pub end_date: Option<DateTime>,
    pub status: PaymentStatus,
    pub plucker_count: i32,
    pub total_amount: f64,
    pub date: DateTime,
    pub details: Vec<PaymentDetail>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Payment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        period: String,
        start_date: Option<DateTime>,
        end_date: Option<DateTime>,
        status: Option<PaymentStatus>,
        total_amount: f64,
        date: Option<DateTime>,
        details: Vec<PaymentDetail>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Uuid::new_v4().to_string(),
            period,
            start_date,
            end_date,
            status: status.unwrap_or(PaymentStatus::Pending),
            plucker_count: details.len() as i32,
            total_amount,
            date: date.unwrap_or(now),
            details,
            created_at: now,
            updated_at: now,
        }
    }
}
