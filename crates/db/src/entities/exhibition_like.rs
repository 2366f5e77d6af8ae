//! Exhibition like entity - a record of a user liking an exhibition.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One like per (user, exhibition) pair; uniqueness is enforced by a storage
/// index, not just application checks.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exhibition_like")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(indexed)]
    pub exhibition_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::exhibition::Entity",
        from = "Column::ExhibitionId",
        to = "super::exhibition::Column::Id",
        on_delete = "Cascade"
    )]
    Exhibition,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::exhibition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exhibition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
