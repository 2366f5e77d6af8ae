//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(unique)]
    pub nickname: String,

    /// Profile image URL
    #[sea_orm(nullable)]
    pub profile_image: Option<String>,

    /// Argon2 hash. NULL for OAuth-provisioned accounts.
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,

    /// OAuth provider name. NULL for local accounts.
    #[sea_orm(nullable)]
    pub oauth_provider: Option<String>,

    /// Soft "quit" flag. Quit users are excluded from lookups.
    #[sea_orm(default_value = false)]
    pub is_quit: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this account was provisioned through OAuth.
    #[must_use]
    pub const fn is_oauth(&self) -> bool {
        self.oauth_provider.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
