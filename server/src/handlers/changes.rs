use axum::{Json, extract::State};
use platform_api::{ApiError, ApiResult};
use products_hr::changes::{self, TransferTarget};
use products_hr::presentation::{self, ChangeView};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::Ack;
use crate::{
    error::hr_error,
    extract::{ApiJson, ApiPath, CurrentUser},
    http::AppState,
};

#[derive(Debug, Serialize)]
pub(crate) struct ChangesResponse {
    changes: Vec<ChangeView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangePayload {
    change: ChangeView,
}

/// Ids arrive either as JSON numbers or as numeric strings from form inputs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    fn resolve(field: &'static str, value: Option<Self>) -> ApiResult<i32> {
        let parsed = match value {
            None => return Err(ApiError::validation(field, format!("{field} is required"))),
            Some(IdInput::Number(n)) => i32::try_from(n).ok(),
            Some(IdInput::Text(text)) => text.trim().parse::<i32>().ok(),
        };
        parsed
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::validation(field, format!("{field} must be a positive integer")))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransferBody {
    new_company: Option<IdInput>,
    new_project: Option<IdInput>,
    effective_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResignBody {
    #[serde(alias = "resign_date")]
    effective_date: Option<String>,
}

pub(crate) async fn list_pending(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<ChangesResponse>> {
    let rows = changes::list_pending(&state.pool).await.map_err(hr_error)?;
    let changes = presentation::change_views(&state.pool, rows)
        .await
        .map_err(hr_error)?;
    Ok(Json(ChangesResponse { changes }))
}

#[instrument(skip_all, fields(employee_id = tracing::field::Empty, user_id = user.0.user_id))]
pub(crate) async fn submit_transfer(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(employee_id): ApiPath<i32>,
    ApiJson(body): ApiJson<TransferBody>,
) -> ApiResult<Json<Ack<ChangePayload>>> {
    tracing::Span::current().record("employee_id", employee_id);
    let company_id = IdInput::resolve("new_company", body.new_company)?;
    let project_id = IdInput::resolve("new_project", body.new_project)?;
    let effective_date = body.effective_date.unwrap_or_default();
    let row = changes::submit_transfer(
        &state.pool,
        employee_id,
        TransferTarget {
            company_id,
            project_id,
            effective_date: &effective_date,
        },
        user.0.user_id,
    )
    .await
    .map_err(hr_error)?;
    respond(&state, "transfer request submitted", row).await
}

#[instrument(skip_all, fields(employee_id = tracing::field::Empty, user_id = user.0.user_id))]
pub(crate) async fn submit_resignation(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(employee_id): ApiPath<i32>,
    ApiJson(body): ApiJson<ResignBody>,
) -> ApiResult<Json<Ack<ChangePayload>>> {
    tracing::Span::current().record("employee_id", employee_id);
    let effective_date = body.effective_date.unwrap_or_default();
    let row = changes::submit_resignation(&state.pool, employee_id, &effective_date, user.0.user_id)
        .await
        .map_err(hr_error)?;
    respond(&state, "resignation request submitted", row).await
}

#[instrument(skip_all, fields(change_id = tracing::field::Empty, user_id = user.0.user_id))]
pub(crate) async fn approve(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(change_id): ApiPath<i32>,
) -> ApiResult<Json<Ack<ChangePayload>>> {
    tracing::Span::current().record("change_id", change_id);
    let row = changes::approve(&state.pool, change_id, user.0.user_id)
        .await
        .map_err(hr_error)?;
    respond(&state, "change request approved", row).await
}

#[instrument(skip_all, fields(change_id = tracing::field::Empty, user_id = user.0.user_id))]
pub(crate) async fn reject(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(change_id): ApiPath<i32>,
) -> ApiResult<Json<Ack<ChangePayload>>> {
    tracing::Span::current().record("change_id", change_id);
    let row = changes::reject(&state.pool, change_id, user.0.user_id)
        .await
        .map_err(hr_error)?;
    respond(&state, "change request rejected", row).await
}

async fn respond(
    state: &AppState,
    message: &'static str,
    row: entity::change_request::Model,
) -> ApiResult<Json<Ack<ChangePayload>>> {
    let change = presentation::change_view(&state.pool, row)
        .await
        .map_err(hr_error)?;
    Ok(Json(Ack::new(message, ChangePayload { change })))
}
