use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Report, ReportKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRangeParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_collection: i64,
    pub active_pluckers: u64,
    pub collection_days: usize,
    pub total_payments: i64,
    pub collection_trend: i64,
    pub pluckers_trend: i64,
    pub payments_trend: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub title: String,
    pub period: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub file_name: String,
    pub file_url: String,
    pub downloads: i64,
    pub created_at: String,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            title: report.title,
            period: report.period,
            kind: report.kind,
            file_name: report.file_name,
            file_url: report.file_url,
            downloads: report.downloads,
            created_at: report.created_at.to_chrono().to_rfc3339(),
        }
    }
}
