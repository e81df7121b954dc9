use sea_orm::prelude::{DateTimeWithTimeZone, *};
use serde::Serialize;

/// A proposed change to an employee's placement or status.
///
/// The `from_*` columns are copied from the employee when the request is
/// submitted and never re-read afterwards. The `to_*` columns are only set
/// for transfers.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "change_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    pub kind: Kind,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    pub from_company_id: Option<i32>,
    pub to_company_id: Option<i32>,
    pub from_project_id: Option<i32>,
    pub to_project_id: Option<i32>,
    pub effective_date: Date,
    #[sea_orm(indexed)]
    pub status: Status,
    pub creator_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub resolved_at: Option<DateTimeWithTimeZone>,
    pub resolved_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Restrict"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::CreatorId",
        to = "super::app_user::Column::Id",
        on_delete = "Restrict"
    )]
    Creator,
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "resignation")]
    Resignation,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Transfer => "transfer",
            Kind::Resignation => "resignation",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
