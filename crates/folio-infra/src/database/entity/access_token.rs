//! Access token entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personal_access_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain AccessToken.
impl From<Model> for folio_core::domain::AccessToken {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from Domain AccessToken to SeaORM ActiveModel.
impl From<folio_core::domain::AccessToken> for ActiveModel {
    fn from(token: folio_core::domain::AccessToken) -> Self {
        Self {
            id: Set(token.id),
            user_id: Set(token.user_id),
            name: Set(token.name),
            created_at: Set(token.created_at.into()),
        }
    }
}
