//! Change-request workflow.
//!
//! A request is `pending` until exactly one of [`approve`] or [`reject`]
//! resolves it. Resolution is a conditional update on `status = pending`
//! inside a transaction, so two concurrent resolutions of the same request
//! cannot both succeed, and an approved request's employee mutation commits
//! together with the status change or not at all.

use chrono::{NaiveDate, Utc};
use entity::change_request::{self, Kind, Status};
use entity::employee;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, instrument, warn};

use crate::employees::{self, parse_date};
use crate::{HrError, HrResult, catalog};

/// Target of a transfer submission.
#[derive(Clone, Debug)]
pub struct TransferTarget<'a> {
    pub company_id: i32,
    pub project_id: i32,
    pub effective_date: &'a str,
}

/// What approving a request does to its employee.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeEffect {
    Transfer {
        company_id: i32,
        project_id: i32,
        effective_date: NaiveDate,
    },
    Resignation {
        effective_date: NaiveDate,
    },
}

impl ChangeEffect {
    pub fn from_request(request: &change_request::Model) -> HrResult<Self> {
        match request.kind {
            Kind::Transfer => match (request.to_company_id, request.to_project_id) {
                (Some(company_id), Some(project_id)) => Ok(Self::Transfer {
                    company_id,
                    project_id,
                    effective_date: request.effective_date,
                }),
                _ => Err(HrError::InvalidState(format!(
                    "transfer request {} has no target placement",
                    request.id
                ))),
            },
            Kind::Resignation => Ok(Self::Resignation {
                effective_date: request.effective_date,
            }),
        }
    }

    pub async fn apply<C: ConnectionTrait>(
        self,
        db: &C,
        employee_id: i32,
    ) -> HrResult<employee::Model> {
        match self {
            Self::Transfer {
                company_id,
                project_id,
                effective_date,
            } => {
                employees::apply_transfer(db, employee_id, company_id, project_id, effective_date)
                    .await
            }
            Self::Resignation { effective_date } => {
                employees::apply_resignation(db, employee_id, effective_date).await
            }
        }
    }
}

#[instrument(skip(db, target), fields(company_id = target.company_id, project_id = target.project_id))]
pub async fn submit_transfer<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    target: TransferTarget<'_>,
    requester_id: i32,
) -> HrResult<change_request::Model> {
    let effective_date = parse_date("effective_date", target.effective_date)?;
    let employee = submittable_employee(db, employee_id).await?;
    catalog::validate_placement(db, target.company_id, target.project_id).await?;

    let request = change_request::ActiveModel {
        kind: Set(Kind::Transfer),
        to_company_id: Set(Some(target.company_id)),
        to_project_id: Set(Some(target.project_id)),
        ..snapshot(&employee, effective_date, requester_id)
    }
    .insert(db)
    .await?;

    info!(change_id = request.id, employee_id, kind = "transfer", "change request submitted");
    Ok(request)
}

#[instrument(skip(db, effective_date))]
pub async fn submit_resignation<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    effective_date: &str,
    requester_id: i32,
) -> HrResult<change_request::Model> {
    let effective_date = parse_date("effective_date", effective_date)?;
    let employee = submittable_employee(db, employee_id).await?;

    let request = change_request::ActiveModel {
        kind: Set(Kind::Resignation),
        to_company_id: Set(None),
        to_project_id: Set(None),
        ..snapshot(&employee, effective_date, requester_id)
    }
    .insert(db)
    .await?;

    info!(change_id = request.id, employee_id, kind = "resignation", "change request submitted");
    Ok(request)
}

pub async fn list_pending<C: ConnectionTrait>(db: &C) -> HrResult<Vec<change_request::Model>> {
    Ok(change_request::Entity::find()
        .filter(change_request::Column::Status.eq(Status::Pending))
        .order_by_asc(change_request::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_change<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<change_request::Model> {
    change_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrError::not_found("change request", id))
}

/// Approve a pending request and apply its effect to the employee.
#[instrument(skip(db))]
pub async fn approve<C>(db: &C, id: i32, approver_id: i32) -> HrResult<change_request::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    resolve(db, id, Status::Approved, approver_id).await
}

/// Reject a pending request. The employee is left untouched.
#[instrument(skip(db))]
pub async fn reject<C>(db: &C, id: i32, approver_id: i32) -> HrResult<change_request::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    resolve(db, id, Status::Rejected, approver_id).await
}

async fn resolve<C>(
    db: &C,
    id: i32,
    outcome: Status,
    resolver_id: i32,
) -> HrResult<change_request::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let resolved_at: DateTimeWithTimeZone = Utc::now().into();

    let claimed = change_request::Entity::update_many()
        .col_expr(change_request::Column::Status, Expr::value(outcome))
        .col_expr(change_request::Column::ResolvedAt, Expr::value(resolved_at))
        .col_expr(change_request::Column::ResolvedBy, Expr::value(resolver_id))
        .filter(change_request::Column::Id.eq(id))
        .filter(change_request::Column::Status.eq(Status::Pending))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        let existing = get_change(&txn, id).await?;
        warn!(
            change_id = id,
            status = existing.status.as_str(),
            "change request already resolved"
        );
        return Err(HrError::InvalidState(format!(
            "change request {id} is already {}",
            existing.status.as_str()
        )));
    }

    let request = get_change(&txn, id).await?;
    if outcome == Status::Approved {
        ChangeEffect::from_request(&request)?
            .apply(&txn, request.employee_id)
            .await?;
    }
    txn.commit().await?;

    info!(
        change_id = id,
        employee_id = request.employee_id,
        kind = request.kind.as_str(),
        status = outcome.as_str(),
        "change request resolved"
    );
    Ok(request)
}

async fn submittable_employee<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
) -> HrResult<employee::Model> {
    let employee = employees::get_employee(db, employee_id).await?;
    if employee.status == employee::Status::Resigned {
        return Err(HrError::InvalidState(format!(
            "employee {employee_id} has resigned"
        )));
    }
    Ok(employee)
}

/// Common columns of a new request. The `from_*` placement is copied from
/// the employee now and never re-read.
fn snapshot(
    employee: &employee::Model,
    effective_date: NaiveDate,
    requester_id: i32,
) -> change_request::ActiveModel {
    change_request::ActiveModel {
        employee_id: Set(employee.id),
        from_company_id: Set(employee.company_id),
        from_project_id: Set(employee.project_id),
        effective_date: Set(effective_date),
        status: Set(Status::Pending),
        creator_id: Set(requester_id),
        created_at: Set(Utc::now().into()),
        resolved_at: Set(None),
        resolved_by: Set(None),
        ..Default::default()
    }
}
