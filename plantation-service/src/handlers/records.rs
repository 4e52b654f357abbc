//! Collection record handlers.
//!
//! Creating, updating and deleting a record also maintains each referenced
//! plucker's running `collection` total. The maintenance is orchestrated
//! here, not inside the repositories, and is not atomic with the record
//! mutation itself; concurrent mutations touching the same plucker can
//! race (an accepted property of the design).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::{doc, DateTime};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{CreateRecordRequest, RecordResponse, UpdateRecordRequest},
    models::{PluckerDetail, Record},
    services::metrics,
    AppState,
};

/// Add each detail line's weight to its plucker's running total. Lines
/// referencing unknown pluckers are skipped.
async fn apply_details(state: &AppState, details: &[PluckerDetail]) -> Result<(), AppError> {
    for detail in details {
        state
            .pluckers
            .increment_collection(&detail.plucker_id, detail.weight)
            .await?;
    }
    Ok(())
}

/// Subtract each detail line's weight from its plucker's running total,
/// flooring at zero even if the total was externally reduced in between.
async fn rollback_details(state: &AppState, details: &[PluckerDetail]) -> Result<(), AppError> {
    for detail in details {
        if let Some(plucker) = state.pluckers.find_by_id(&detail.plucker_id).await? {
            let reduced = (plucker.collection - detail.weight).max(0.0);
            state
                .pluckers
                .set_collection(&detail.plucker_id, reduced)
                .await?;
        }
    }
    Ok(())
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    payload.validate()?;

    let record = Record::new(
        DateTime::from_chrono(payload.date),
        payload.total_weight,
        payload.plucker_count,
        payload.average_price,
        payload
            .plucker_details
            .into_iter()
            .map(PluckerDetail::from)
            .collect(),
    );

    tracing::info!(
        record_id = %record.id,
        total_weight = record.total_weight,
        plucker_count = record.plucker_count,
        "Creating collection record"
    );

    state.records.create(&record).await?;
    apply_details(&state, &record.plucker_details).await?;
    metrics::record_created();

    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let records = state.records.list().await?;
    Ok(Json(
        records.into_iter().map(RecordResponse::from).collect(),
    ))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<RecordResponse>, AppError> {
    let record = state
        .records
        .find_by_id(&record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Record not found")))?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    payload.validate()?;

    let existing = state
        .records
        .find_by_id(&record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Record not found")))?;

    let mut fields = doc! {};
    if let Some(date) = payload.date {
        fields.insert("date", DateTime::from_chrono(date));
    }
    if let Some(total_weight) = payload.total_weight {
        fields.insert("total_weight", total_weight);
    }
    if let Some(plucker_count) = payload.plucker_count {
        fields.insert("plucker_count", plucker_count);
    }
    if let Some(average_price) = payload.average_price {
        fields.insert("average_price", average_price);
    }

    let new_details: Option<Vec<PluckerDetail>> = payload
        .plucker_details
        .map(|details| details.into_iter().map(PluckerDetail::from).collect());
    if let Some(ref details) = new_details {
        let details_bson = mongodb::bson::to_bson(details).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to serialize details: {}", e))
        })?;
        fields.insert("plucker_details", details_bson);
    }

    let record = state
        .records
        .update(&record_id, fields)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Record not found")))?;

    // Changing the detail lines moves the plucker totals with them: the old
    // lines are rolled back and the new ones applied, so the cached totals
    // track the records instead of silently drifting.
    if let Some(details) = new_details {
        rollback_details(&state, &existing.plucker_details).await?;
        apply_details(&state, &details).await?;
    }

    Ok(Json(RecordResponse::from(record)))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state
        .records
        .find_by_id(&record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Record not found")))?;

    rollback_details(&state, &record.plucker_details).await?;
    state.records.delete(&record_id).await?;

    tracing::info!(record_id = %record_id, "Record removed");
    Ok(Json(serde_json::json!({ "message": "Record removed" })))
}
