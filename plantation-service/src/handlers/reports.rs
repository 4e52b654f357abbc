//! Report handlers: the plucker performance PDF, stored report metadata
//! and the dashboard statistics.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use mongodb::bson::DateTime;
use service_core::error::AppError;

use crate::{
    dtos::{DashboardStats, DashboardStatsResponse, ReportRangeParams, ReportResponse},
    models::{Report, ReportKind},
    services::aggregation::{day_range_utc, period_label},
    services::metrics,
    services::pdf::render_plucker_report,
    services::report::{build_report_rows, report_file_name},
    AppState,
};

const REPORT_TITLE: &str = "Plucker Performance Report";

/// Generate the per-plucker PDF for a date range and hand it back as an
/// attachment. The file is also kept in the upload directory and recorded
/// in the reports collection. Any read failure aborts the generation; no
/// partial report is produced.
pub async fn generate_plucker_report(
    State(state): State<AppState>,
    Query(params): Query<ReportRangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = match (params.start_date, params.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Start date and end date are required"
            )));
        }
    };

    let (start_instant, end_instant) = day_range_utc(start, end);

    // Three independent reads; a report can observe a torn view if writes
    // land in between (no snapshot isolation, as documented).
    let pluckers = state.pluckers.list().await?;
    let records = state
        .records
        .find_by_date_range(start_instant, end_instant)
        .await?;
    let payments = state
        .payments
        .find_by_date_range(start_instant, end_instant)
        .await?;

    let rows = build_report_rows(&pluckers, &records, &payments);
    let period = period_label(start, end);
    let bytes = render_plucker_report(REPORT_TITLE, &format!("Period: {}", period), &rows)?;

    let file_name = report_file_name();
    state.storage.upload(&file_name, bytes.clone()).await?;

    let report = Report::new(
        REPORT_TITLE.to_string(),
        period,
        ReportKind::Performance,
        file_name.clone(),
        format!("/uploads/{}", file_name),
    );
    state.reports.create(&report).await?;

    tracing::info!(
        report_id = %report.id,
        file_name = %file_name,
        rows = rows.len(),
        "Plucker report generated"
    );
    metrics::report_generated();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}

pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportResponse>>, AppError> {
    let reports = state.reports.list().await?;
    Ok(Json(
        reports.into_iter().map(ReportResponse::from).collect(),
    ))
}

/// Serve a previously generated report file, counting the download.
pub async fn download_report_file(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let report = state
        .reports
        .find_by_id(&report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Report not found")))?;

    let bytes = state.storage.download(&report.file_name).await?;
    state.reports.increment_downloads(&report.id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        bytes,
    ))
}

fn month_window(year: i32, month: u32) -> Result<(DateTime, DateTime), AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Invalid month window")))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Invalid month window")))?;
    let last = next_first.pred_opt().unwrap_or(first);
    Ok(day_range_utc(first, last))
}

fn trend_percent(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        0
    } else {
        (((current - previous) / previous) * 100.0).round() as i64
    }
}

/// Month-over-month headline numbers for the dashboard.
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStatsResponse>, AppError> {
    let now = Utc::now();
    let (year, month) = (now.year(), now.month());
    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    let (month_start, month_end) = month_window(year, month)?;
    let (prev_start, prev_end) = month_window(prev_year, prev_month)?;

    let records = state.records.find_by_date_range(month_start, month_end).await?;
    let prev_records = state.records.find_by_date_range(prev_start, prev_end).await?;

    let active_pluckers = state.pluckers.count_active(None).await?;
    let prev_active_pluckers = state.pluckers.count_active(Some(month_start)).await?;

    let payments = state.payments.find_by_date_range(month_start, month_end).await?;
    let prev_payments = state.payments.find_by_date_range(prev_start, prev_end).await?;

    let total_collection: f64 = records.iter().map(|r| r.total_weight).sum();
    let prev_total_collection: f64 = prev_records.iter().map(|r| r.total_weight).sum();

    let total_payments: f64 = payments.iter().map(|p| p.total_amount).sum();
    let prev_total_payments: f64 = prev_payments.iter().map(|p| p.total_amount).sum();

    let stats = DashboardStats {
        total_collection: total_collection.round() as i64,
        active_pluckers,
        collection_days: records.len(),
        total_payments: total_payments.round() as i64,
        collection_trend: trend_percent(total_collection, prev_total_collection),
        pluckers_trend: trend_percent(active_pluckers as f64, prev_active_pluckers as f64),
        payments_trend: trend_percent(total_payments, prev_total_payments),
    };

    Ok(Json(DashboardStatsResponse { stats }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_is_zero_when_previous_month_is_empty() {
        assert_eq!(trend_percent(100.0, 0.0), 0);
    }

    #[test]
    fn trend_rounds_to_whole_percent() {
        assert_eq!(trend_percent(150.0, 100.0), 50);
        assert_eq!(trend_percent(100.0, 150.0), -33);
        assert_eq!(trend_percent(100.0, 100.0), 0);
    }

    #[test]
    fn month_window_spans_the_calendar_month() {
        let (start, end) = month_window(2023, 12).expect("window");
        assert_eq!(start.to_chrono().date_naive().to_string(), "2023-12-01");
        assert_eq!(end.to_chrono().date_naive().to_string(), "2023-12-31");

        let (start, end) = month_window(2024, 2).expect("window");
        assert_eq!(start.to_chrono().date_naive().to_string(), "2024-02-01");
        assert_eq!(end.to_chrono().date_naive().to_string(), "2024-02-29");
    }
}
