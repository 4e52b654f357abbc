//! Registration, login and profile management.

use axum::{extract::State, http::StatusCode, Json};
use mongodb::bson::doc;
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest, UserResponse},
    middleware::AuthUser,
    models::User,
    utils::password::{hash_password, verify_password},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    payload.validate()?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::BadRequest(anyhow::anyhow!("User already exists")));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(
        payload.name,
        payload.email,
        password_hash,
        payload.role,
        payload.phone,
        payload.location,
    );

    tracing::info!(user_id = %user.id, email = %user.email, "Registering user");
    state.users.create(&user).await?;

    let token = state.jwt.generate_access_token(&user.id, &user.email)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    // Unknown email and wrong password are indistinguishable to the caller
    let user = state
        .users
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Invalid credentials")))?;

    verify_password(&payload.password, &user.password_hash)
        .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("Invalid credentials")))?;

    let token = state.jwt.generate_access_token(&user.id, &user.email)?;
    Ok(Json(TokenResponse { token }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let mut fields = doc! {};
    if let Some(name) = payload.name {
        fields.insert("name", name);
    }
    if let Some(email) = payload.email {
        fields.insert("email", email);
    }
    if let Some(password) = payload.password {
        fields.insert("password_hash", hash_password(&password)?);
    }
    if let Some(phone) = payload.phone {
        fields.insert("phone", phone);
    }
    if let Some(location) = payload.location {
        fields.insert("location", location);
    }

    let user = state
        .users
        .update(&claims.sub, fields)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(UserResponse::from(user)))
}
