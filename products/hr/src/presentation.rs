//! Wire representations with foreign keys resolved to names.
//!
//! Names are looked up in one query per referenced table, whatever the
//! number of rows being rendered.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use entity::change_request::{self, Kind};
use entity::{company, employee, project};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::HrResult;

#[derive(Clone, Debug, Serialize)]
pub struct CompanyView {
    pub id: i32,
    pub name: String,
}

impl From<company::Model> for CompanyView {
    fn from(model: company::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectView {
    pub id: i32,
    pub name: String,
    pub company_id: i32,
}

impl From<project::Model> for ProjectView {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            company_id: model.company_id,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EmployeeView {
    pub id: i32,
    pub name: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub status: employee::Status,
    pub company_id: Option<i32>,
    pub company_name: Option<String>,
    pub project_id: Option<i32>,
    pub project_name: Option<String>,
    pub creator_id: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChangeView {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub from_company_id: Option<i32>,
    pub from_company_name: Option<String>,
    pub to_company_id: Option<i32>,
    pub to_company_name: Option<String>,
    pub from_project_id: Option<i32>,
    pub from_project_name: Option<String>,
    pub to_project_id: Option<i32>,
    pub to_project_name: Option<String>,
    pub effective_date: NaiveDate,
    pub status: change_request::Status,
    pub creator_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub resolved_at: Option<DateTimeWithTimeZone>,
    pub resolved_by: Option<i32>,
}

#[derive(Default)]
struct Names {
    companies: HashMap<i32, String>,
    projects: HashMap<i32, String>,
    employees: HashMap<i32, String>,
}

impl Names {
    async fn load<C: ConnectionTrait>(
        db: &C,
        company_ids: BTreeSet<i32>,
        project_ids: BTreeSet<i32>,
        employee_ids: BTreeSet<i32>,
    ) -> HrResult<Self> {
        let mut names = Names::default();
        if !company_ids.is_empty() {
            names.companies = company::Entity::find()
                .filter(company::Column::Id.is_in(company_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|row| (row.id, row.name))
                .collect();
        }
        if !project_ids.is_empty() {
            names.projects = project::Entity::find()
                .filter(project::Column::Id.is_in(project_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|row| (row.id, row.name))
                .collect();
        }
        if !employee_ids.is_empty() {
            names.employees = employee::Entity::find()
                .filter(employee::Column::Id.is_in(employee_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|row| (row.id, row.name))
                .collect();
        }
        Ok(names)
    }

    fn company(&self, id: Option<i32>) -> Option<String> {
        id.and_then(|id| self.companies.get(&id).cloned())
    }

    fn project(&self, id: Option<i32>) -> Option<String> {
        id.and_then(|id| self.projects.get(&id).cloned())
    }
}

pub async fn employee_views<C: ConnectionTrait>(
    db: &C,
    rows: Vec<employee::Model>,
) -> HrResult<Vec<EmployeeView>> {
    let company_ids = rows.iter().filter_map(|row| row.company_id).collect();
    let project_ids = rows.iter().filter_map(|row| row.project_id).collect();
    let names = Names::load(db, company_ids, project_ids, BTreeSet::new()).await?;

    Ok(rows
        .into_iter()
        .map(|row| EmployeeView {
            company_name: names.company(row.company_id),
            project_name: names.project(row.project_id),
            id: row.id,
            name: row.name,
            position: row.position,
            hire_date: row.hire_date,
            status: row.status,
            company_id: row.company_id,
            project_id: row.project_id,
            creator_id: row.creator_id,
        })
        .collect())
}

pub async fn employee_view<C: ConnectionTrait>(
    db: &C,
    row: employee::Model,
) -> HrResult<EmployeeView> {
    let mut views = employee_views(db, vec![row]).await?;
    Ok(views.remove(0))
}

pub async fn change_views<C: ConnectionTrait>(
    db: &C,
    rows: Vec<change_request::Model>,
) -> HrResult<Vec<ChangeView>> {
    let company_ids = rows
        .iter()
        .flat_map(|row| [row.from_company_id, row.to_company_id])
        .flatten()
        .collect();
    let project_ids = rows
        .iter()
        .flat_map(|row| [row.from_project_id, row.to_project_id])
        .flatten()
        .collect();
    let employee_ids = rows.iter().map(|row| row.employee_id).collect();
    let names = Names::load(db, company_ids, project_ids, employee_ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| ChangeView {
            employee_name: names.employees.get(&row.employee_id).cloned(),
            from_company_name: names.company(row.from_company_id),
            to_company_name: names.company(row.to_company_id),
            from_project_name: names.project(row.from_project_id),
            to_project_name: names.project(row.to_project_id),
            id: row.id,
            kind: row.kind,
            employee_id: row.employee_id,
            from_company_id: row.from_company_id,
            to_company_id: row.to_company_id,
            from_project_id: row.from_project_id,
            to_project_id: row.to_project_id,
            effective_date: row.effective_date,
            status: row.status,
            creator_id: row.creator_id,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
            resolved_by: row.resolved_by,
        })
        .collect())
}

pub async fn change_view<C: ConnectionTrait>(
    db: &C,
    row: change_request::Model,
) -> HrResult<ChangeView> {
    let mut views = change_views(db, vec![row]).await?;
    Ok(views.remove(0))
}
