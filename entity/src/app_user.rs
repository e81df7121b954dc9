use sea_orm::prelude::{DateTimeWithTimeZone, *};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Employee,
    ChangeRequest,
    RevokedToken,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Employee => Entity::has_many(super::employee::Entity).into(),
            Relation::ChangeRequest => Entity::has_many(super::change_request::Entity).into(),
            Relation::RevokedToken => Entity::has_many(super::revoked_token::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
