//! Plucker directory handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::{doc, DateTime};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{CreatePluckerRequest, PluckerResponse, TopPluckersParams, UpdatePluckerRequest},
    models::Plucker,
    AppState,
};

const DEFAULT_TOP_LIMIT: i64 = 5;

pub async fn create_plucker(
    State(state): State<AppState>,
    Json(payload): Json<CreatePluckerRequest>,
) -> Result<(StatusCode, Json<PluckerResponse>), AppError> {
    payload.validate()?;

    let plucker = Plucker::new(
        payload.name,
        payload.phone,
        payload.address,
        payload.join_date.map(DateTime::from_chrono),
        payload.status,
    );

    tracing::info!(plucker_id = %plucker.id, name = %plucker.name, "Registering plucker");
    state.pluckers.create(&plucker).await?;

    Ok((StatusCode::CREATED, Json(PluckerResponse::from(plucker))))
}

pub async fn list_pluckers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PluckerResponse>>, AppError> {
    let pluckers = state.pluckers.list().await?;
    Ok(Json(
        pluckers.into_iter().map(PluckerResponse::from).collect(),
    ))
}

pub async fn top_pluckers(
    State(state): State<AppState>,
    Query(params): Query<TopPluckersParams>,
) -> Result<Json<Vec<PluckerResponse>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_LIMIT).max(1);
    let pluckers = state.pluckers.top_by_collection(limit).await?;
    Ok(Json(
        pluckers.into_iter().map(PluckerResponse::from).collect(),
    ))
}

pub async fn get_plucker(
    State(state): State<AppState>,
    Path(plucker_id): Path<String>,
) -> Result<Json<PluckerResponse>, AppError> {
    let plucker = state
        .pluckers
        .find_by_id(&plucker_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plucker not found")))?;

    Ok(Json(PluckerResponse::from(plucker)))
}

pub async fn update_plucker(
    State(state): State<AppState>,
    Path(plucker_id): Path<String>,
    Json(payload): Json<UpdatePluckerRequest>,
) -> Result<Json<PluckerResponse>, AppError> {
    payload.validate()?;

    let mut fields = doc! {};
    if let Some(name) = payload.name {
        fields.insert("name", name);
    }
    if let Some(phone) = payload.phone {
        fields.insert("phone", phone);
    }
    if let Some(address) = payload.address {
        fields.insert("address", address);
    }
    if let Some(join_date) = payload.join_date {
        fields.insert("join_date", DateTime::from_chrono(join_date));
    }
    if let Some(status) = payload.status {
        let status = mongodb::bson::to_bson(&status)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to serialize status: {}", e)))?;
        fields.insert("status", status);
    }
    if let Some(collection) = payload.collection {
        fields.insert("collection", collection);
    }

    let plucker = state
        .pluckers
        .update(&plucker_id, fields)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plucker not found")))?;

    Ok(Json(PluckerResponse::from(plucker)))
}

pub async fn delete_plucker(
    State(state): State<AppState>,
    Path(plucker_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Hard delete; historical records keep their dangling references
    let deleted = state.pluckers.delete(&plucker_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Plucker not found")));
    }

    tracing::info!(plucker_id = %plucker_id, "Plucker removed");
    Ok(Json(serde_json::json!({ "message": "Plucker removed" })))
}
