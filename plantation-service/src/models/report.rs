use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Collection,
    Payment,
    Performance,
}

/// Metadata for a generated report file kept in the upload directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub period: String,
    pub kind: ReportKind,
    pub file_name: String,
    pub file_url: String,
    pub downloads: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Report {
    pub fn new(
        title: String,
        period: String,
        kind: ReportKind,
        file_name: String,
        file_url: String,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            period,
            kind,
            file_name,
            file_url,
            downloads: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
