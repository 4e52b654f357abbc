//! Payment handlers: CRUD, the draft aggregator and completion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::{doc, DateTime};
use service_core::error::AppError;
use std::collections::HashMap;
use validator::Validate;

use crate::{
    dtos::{
        CreatePaymentRequest, GeneratePaymentRequest, PaymentDraftResponse, PaymentListParams,
        PaymentResponse, PluckerSummary, PopulatedPaymentDetail, RecordResponse,
        UpdatePaymentRequest,
    },
    models::{Payment, PaymentDetail, PaymentStatus},
    services::aggregation::{aggregate_records, day_range_utc},
    services::metrics,
    AppState,
};

/// Resolve a payment's detail references at read time: plucker ids become
/// `{id, name, phone}` summaries (None when the plucker has since been
/// deleted) and record ids become full record documents.
async fn populate_payment(
    state: &AppState,
    payment: Payment,
) -> Result<PaymentResponse, AppError> {
    let plucker_ids: Vec<String> = payment
        .details
        .iter()
        .map(|d| d.plucker_id.clone())
        .collect();
    let record_ids: Vec<String> = payment
        .details
        .iter()
        .flat_map(|d| d.record_ids.iter().cloned())
        .collect();

    let pluckers = state.pluckers.find_by_ids(&plucker_ids).await?;
    let records = state.records.find_by_ids(&record_ids).await?;

    let plucker_map: HashMap<String, PluckerSummary> = pluckers
        .into_iter()
        .map(|p| {
            (
                p.id.clone(),
                PluckerSummary {
                    id: p.id,
                    name: p.name,
                    phone: p.phone,
                },
            )
        })
        .collect();
    let record_map: HashMap<String, RecordResponse> = records
        .into_iter()
        .map(|r| (r.id.clone(), RecordResponse::from(r)))
        .collect();

    let details = payment
        .details
        .iter()
        .map(|detail| PopulatedPaymentDetail {
            plucker: plucker_map.get(&detail.plucker_id).cloned(),
            amount: detail.amount,
            records: detail
                .record_ids
                .iter()
                .filter_map(|id| record_map.get(id).cloned())
                .collect(),
        })
        .collect();

    Ok(PaymentResponse::from_payment(&payment, details))
}

async fn populate_payments(
    state: &AppState,
    payments: Vec<Payment>,
) -> Result<Vec<PaymentResponse>, AppError> {
    let mut responses = Vec::with_capacity(payments.len());
    for payment in payments {
        responses.push(populate_payment(state, payment).await?);
    }
    Ok(responses)
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let mut filter = doc! {};
    if let Some(status) = params.status {
        let status = mongodb::bson::to_bson(&status).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to serialize status: {}", e))
        })?;
        filter.insert("status", status);
    }
    if let (Some(start), Some(end)) = (params.start_date, params.end_date) {
        let (start, end) = day_range_utc(start, end);
        filter.insert("date", doc! { "$gte": start, "$lte": end });
    }

    let payments = state.payments.list(filter).await?;
    Ok(Json(populate_payments(&state, payments).await?))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment = state
        .payments
        .find_by_id(&payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    Ok(Json(populate_payment(&state, payment).await?))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    payload.validate()?;

    let start_date = payload
        .start_date
        .map(|d| day_range_utc(d, d).0);
    let end_date = payload.end_date.map(|d| day_range_utc(d, d).0);

    let payment = Payment::new(
        payload.period,
        start_date,
        end_date,
        payload.status,
        payload.total_amount,
        payload.date.map(DateTime::from_chrono),
        payload
            .details
            .into_iter()
            .map(PaymentDetail::from)
            .collect(),
    );

    tracing::info!(
        payment_id = %payment.id,
        period = %payment.period,
        total_amount = payment.total_amount,
        plucker_count = payment.plucker_count,
        "Creating payment"
    );

    state.payments.create(&payment).await?;
    metrics::payment_recorded("created");

    let response = populate_payment(&state, payment).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    payload.validate()?;

    state
        .payments
        .find_by_id(&payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    let mut fields = doc! {};
    if let Some(period) = payload.period {
        fields.insert("period", period);
    }
    if let Some(start) = payload.start_date {
        fields.insert("start_date", day_range_utc(start, start).0);
    }
    if let Some(end) = payload.end_date {
        fields.insert("end_date", day_range_utc(end, end).0);
    }
    if let Some(status) = payload.status {
        let status = mongodb::bson::to_bson(&status).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to serialize status: {}", e))
        })?;
        fields.insert("status", status);
    }
    if let Some(total_amount) = payload.total_amount {
        fields.insert("total_amount", total_amount);
    }
    if let Some(date) = payload.date {
        fields.insert("date", DateTime::from_chrono(date));
    }
    if let Some(details) = payload.details {
        let details: Vec<PaymentDetail> =
            details.into_iter().map(PaymentDetail::from).collect();
        let count = details.len() as i32;
        let details_bson = mongodb::bson::to_bson(&details).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to serialize details: {}", e))
        })?;
        fields.insert("details", details_bson);
        fields.insert("plucker_count", count);
    }

    let payment = state
        .payments
        .update(&payment_id, fields)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    Ok(Json(populate_payment(&state, payment).await?))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.payments.delete(&payment_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Payment not found")));
    }

    tracing::info!(payment_id = %payment_id, "Payment removed");
    Ok(Json(serde_json::json!({ "message": "Payment removed" })))
}

/// Derive a draft payment for a period. The draft is returned to the
/// caller, never persisted; storing it requires a separate create call.
pub async fn generate_payment(
    State(state): State<AppState>,
    Json(payload): Json<GeneratePaymentRequest>,
) -> Result<Json<PaymentDraftResponse>, AppError> {
    let (start, end) = match (payload.start_date, payload.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Start date and end date are required"
            )));
        }
    };

    let (start_instant, end_instant) = day_range_utc(start, end);
    let records = state
        .records
        .find_by_date_range(start_instant, end_instant)
        .await?;

    let draft = aggregate_records(&records, start, end);
    tracing::info!(
        period = %draft.period,
        plucker_count = draft.plucker_count,
        total_amount = draft.total_amount,
        "Generated payment draft"
    );

    Ok(Json(PaymentDraftResponse::from(draft)))
}

pub async fn complete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment = state
        .payments
        .find_by_id(&payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    // Completing twice is a user error, not a server error
    if payment.status == PaymentStatus::Completed {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Payment already completed"
        )));
    }

    let payment = state
        .payments
        .complete(&payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    tracing::info!(payment_id = %payment_id, "Payment completed");
    metrics::payment_recorded("completed");

    Ok(Json(populate_payment(&state, payment).await?))
}

pub async fn payments_by_plucker(
    State(state): State<AppState>,
    Path(plucker_id): Path<String>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let payments = state.payments.find_by_plucker(&plucker_id).await?;
    Ok(Json(populate_payments(&state, payments).await?))
}
