use entity::{company, project};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{HrError, HrResult};

pub async fn list_companies<C: ConnectionTrait>(db: &C) -> HrResult<Vec<company::Model>> {
    Ok(company::Entity::find()
        .order_by_asc(company::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_company<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<company::Model> {
    company::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrError::not_found("company", id))
}

pub async fn get_project<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<project::Model> {
    project::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrError::not_found("project", id))
}

/// Projects owned by `company_id`. Fails with `NotFound` when the company
/// itself does not exist, so an empty list always means "no projects yet".
pub async fn list_projects_for_company<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
) -> HrResult<Vec<project::Model>> {
    get_company(db, company_id).await?;
    Ok(project::Entity::find()
        .filter(project::Column::CompanyId.eq(company_id))
        .order_by_asc(project::Column::Id)
        .all(db)
        .await?)
}

/// Check that a transfer target exists and is consistent.
pub async fn validate_placement<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
    project_id: i32,
) -> HrResult<(company::Model, project::Model)> {
    let company = get_company(db, company_id).await?;
    let project = get_project(db, project_id).await?;
    if project.company_id != company.id {
        return Err(HrError::validation(
            "new_project",
            format!(
                "project {} does not belong to company {}",
                project.id, company.id
            ),
        ));
    }
    Ok((company, project))
}
