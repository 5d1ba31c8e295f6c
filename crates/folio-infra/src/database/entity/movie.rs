//! Movie entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub title: String,
    pub author: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for folio_core::domain::Movie {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            title: model.title,
            author: model.author,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
