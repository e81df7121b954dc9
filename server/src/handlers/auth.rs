use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, FixedOffset};
use platform_api::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::Ack;
use crate::{
    error::authn_error,
    extract::{ApiJson, CurrentUser},
    http::AppState,
};

#[derive(Debug, Deserialize)]
pub(crate) struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    fn into_parts(self) -> ApiResult<(String, String)> {
        let username = self
            .username
            .ok_or_else(|| ApiError::validation("username", "username is required"))?;
        let password = self
            .password
            .ok_or_else(|| ApiError::validation("password", "password is required"))?;
        Ok((username, password))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserInfo {
    id: i32,
    username: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    token: String,
    user: UserInfo,
}

#[derive(Debug, Serialize)]
pub(crate) struct MeResponse {
    id: i32,
    username: String,
    created_at: DateTime<FixedOffset>,
}

#[instrument(skip_all)]
pub(crate) async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<(StatusCode, Json<Ack<serde_json::Value>>)> {
    let (username, password) = body.into_parts()?;
    let user = platform_authn::register(&state.pool, &username, &password)
        .await
        .map_err(authn_error)?;
    Ok((
        StatusCode::CREATED,
        Json(Ack::new(
            "registration successful",
            json!({ "user_id": user.id }),
        )),
    ))
}

#[instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let (username, password) = body.into_parts()?;
    let outcome = platform_authn::login(&state.pool, &state.config.auth, &username, &password)
        .await
        .map_err(authn_error)?;
    Ok(Json(LoginResponse {
        token: outcome.token,
        user: UserInfo {
            id: outcome.user.id,
            username: outcome.user.username,
        },
    }))
}

#[instrument(skip_all, fields(user_id = user.0.user_id))]
pub(crate) async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Ack<serde_json::Value>>> {
    platform_authn::logout(&state.pool, &user.0)
        .await
        .map_err(authn_error)?;
    Ok(Json(Ack::new("logged out", json!({}))))
}

pub(crate) async fn me(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<MeResponse>> {
    let user = platform_authn::find_user(&state.pool, principal.user_id)
        .await
        .map_err(authn_error)?
        .ok_or_else(|| ApiError::unauthorized("unknown user"))?;
    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
    }))
}
