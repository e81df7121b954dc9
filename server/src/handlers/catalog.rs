use axum::{Json, extract::State};
use platform_api::ApiResult;
use products_hr::catalog;
use products_hr::presentation::{CompanyView, ProjectView};
use serde::Serialize;

use crate::{error::hr_error, extract::ApiPath, http::AppState};

#[derive(Debug, Serialize)]
pub(crate) struct CompaniesResponse {
    companies: Vec<CompanyView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectsResponse {
    projects: Vec<ProjectView>,
}

pub(crate) async fn list_companies(
    State(state): State<AppState>,
) -> ApiResult<Json<CompaniesResponse>> {
    let companies = catalog::list_companies(&state.pool)
        .await
        .map_err(hr_error)?;
    Ok(Json(CompaniesResponse {
        companies: companies.into_iter().map(CompanyView::from).collect(),
    }))
}

pub(crate) async fn list_projects(
    State(state): State<AppState>,
    ApiPath(company_id): ApiPath<i32>,
) -> ApiResult<Json<ProjectsResponse>> {
    let projects = catalog::list_projects_for_company(&state.pool, company_id)
        .await
        .map_err(hr_error)?;
    Ok(Json(ProjectsResponse {
        projects: projects.into_iter().map(ProjectView::from).collect(),
    }))
}
