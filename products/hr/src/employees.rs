use chrono::NaiveDate;
use entity::employee::{self, Status};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{HrError, HrResult};

const MAX_TEXT_LEN: usize = 64;

/// Input for [`add_employee`]. Fields are optional so missing values surface
/// as field-level validation errors rather than body parse failures.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewEmployee {
    pub name: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<String>,
}

#[instrument(skip(db, input))]
pub async fn add_employee<C: ConnectionTrait>(
    db: &C,
    input: NewEmployee,
    creator_id: i32,
) -> HrResult<employee::Model> {
    let name = required_text("name", input.name.as_deref())?;
    let position = required_text("position", input.position.as_deref())?;
    let hire_date = parse_date(
        "hire_date",
        input
            .hire_date
            .as_deref()
            .ok_or_else(|| HrError::validation("hire_date", "hire_date is required"))?,
    )?;

    let model = employee::ActiveModel {
        name: Set(name),
        position: Set(position),
        hire_date: Set(hire_date),
        status: Set(Status::PendingAssignment),
        company_id: Set(None),
        project_id: Set(None),
        creator_id: Set(creator_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(employee_id = model.id, "employee added");
    Ok(model)
}

pub async fn get_employee<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<employee::Model> {
    employee::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrError::not_found("employee", id))
}

/// Everyone who has not resigned, placed or not.
pub async fn list_active_employees<C: ConnectionTrait>(db: &C) -> HrResult<Vec<employee::Model>> {
    Ok(employee::Entity::find()
        .filter(employee::Column::Status.is_in([Status::Active, Status::PendingAssignment]))
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?)
}

/// Move an employee to a new placement. A pending-assignment employee
/// becomes active.
pub async fn apply_transfer<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    company_id: i32,
    project_id: i32,
    effective_date: NaiveDate,
) -> HrResult<employee::Model> {
    let mut changes = employee::ActiveModel {
        company_id: Set(Some(company_id)),
        project_id: Set(Some(project_id)),
        status: Set(Status::Active),
        ..Default::default()
    };
    stamp_effective_date(&mut changes, effective_date);
    update_unless_resigned(db, employee_id, changes, "cannot be transferred").await
}

pub async fn apply_resignation<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    effective_date: NaiveDate,
) -> HrResult<employee::Model> {
    let mut changes = employee::ActiveModel {
        status: Set(Status::Resigned),
        ..Default::default()
    };
    stamp_effective_date(&mut changes, effective_date);
    update_unless_resigned(db, employee_id, changes, "has already resigned").await
}

/// Applies `changes` with a single conditional update. Resigned rows are
/// left untouched.
async fn update_unless_resigned<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    changes: employee::ActiveModel,
    refusal: &str,
) -> HrResult<employee::Model> {
    let updated = employee::Entity::update_many()
        .set(changes)
        .filter(employee::Column::Id.eq(employee_id))
        .filter(employee::Column::Status.ne(Status::Resigned))
        .exec(db)
        .await?;

    let current = get_employee(db, employee_id).await?;
    if updated.rows_affected == 0 {
        return Err(HrError::InvalidState(format!(
            "employee {employee_id} {refusal}"
        )));
    }
    Ok(current)
}

/// The only place that records the date of the latest approved change.
/// It lives in `hire_date` until the schema grows a dedicated column.
pub fn stamp_effective_date(active: &mut employee::ActiveModel, effective_date: NaiveDate) {
    active.hire_date = Set(effective_date);
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, raw: &str) -> HrResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(HrError::validation(field, format!("{field} is required")));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        HrError::validation(field, format!("{field} must be a date formatted as YYYY-MM-DD"))
    })
}

fn required_text(field: &'static str, value: Option<&str>) -> HrResult<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(HrError::validation(field, format!("{field} is required")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(HrError::validation(
            field,
            format!("{field} must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(value.to_string())
}
