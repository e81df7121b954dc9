use sea_orm::prelude::{DateTimeWithTimeZone, *};

/// One revoked access token, keyed by its `jti` claim.
///
/// Rows only matter until `expires_at`; after that the token would fail
/// signature validation anyway and the row can be pruned.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "revoked_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub jti: String,
    #[sea_orm(indexed)]
    pub user_id: i32,
    pub revoked_at: DateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::UserId",
        to = "super::app_user::Column::Id",
        on_delete = "Cascade"
    )]
    AppUser,
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
