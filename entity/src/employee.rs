use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub position: String,
    /// Hire date on creation; overwritten with the effective date of every
    /// approved change afterwards.
    pub hire_date: Date,
    #[sea_orm(indexed)]
    pub status: Status,
    #[sea_orm(indexed)]
    pub company_id: Option<i32>,
    #[sea_orm(indexed)]
    pub project_id: Option<i32>,
    pub creator_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Restrict"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Restrict"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::CreatorId",
        to = "super::app_user::Column::Id",
        on_delete = "Restrict"
    )]
    Creator,
    #[sea_orm(has_many = "super::change_request::Entity")]
    ChangeRequest,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::change_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChangeRequest.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[sea_orm(string_value = "pending-assignment")]
    PendingAssignment,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "resigned")]
    Resigned,
}

impl ActiveModelBehavior for ActiveModel {}
