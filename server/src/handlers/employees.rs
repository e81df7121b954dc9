use axum::{Json, extract::State, http::StatusCode};
use platform_api::ApiResult;
use products_hr::employees::{self, NewEmployee};
use products_hr::presentation::{self, EmployeeView};
use serde::Serialize;
use tracing::instrument;

use crate::{
    error::hr_error,
    extract::{ApiJson, CurrentUser},
    http::AppState,
};

#[derive(Debug, Serialize)]
pub(crate) struct EmployeesResponse {
    employees: Vec<EmployeeView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeResponse {
    employee: EmployeeView,
}

pub(crate) async fn list_active(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<EmployeesResponse>> {
    let rows = employees::list_active_employees(&state.pool)
        .await
        .map_err(hr_error)?;
    let employees = presentation::employee_views(&state.pool, rows)
        .await
        .map_err(hr_error)?;
    Ok(Json(EmployeesResponse { employees }))
}

#[instrument(skip_all, fields(user_id = user.0.user_id))]
pub(crate) async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(body): ApiJson<NewEmployee>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    let row = employees::add_employee(&state.pool, body, user.0.user_id)
        .await
        .map_err(hr_error)?;
    let employee = presentation::employee_view(&state.pool, row)
        .await
        .map_err(hr_error)?;
    Ok((StatusCode::CREATED, Json(EmployeeResponse { employee })))
}
