//! Exhibition entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Exhibition genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Genre {
    #[sea_orm(string_value = "painting")]
    Painting,
    #[sea_orm(string_value = "sculpture")]
    Sculpture,
    #[sea_orm(string_value = "craft")]
    Craft,
    #[sea_orm(string_value = "photography")]
    Photography,
    #[sea_orm(string_value = "media")]
    Media,
    #[sea_orm(string_value = "installation")]
    Installation,
    #[sea_orm(string_value = "etc")]
    Etc,
}

/// Administrative areas an exhibition can be located in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Area {
    #[sea_orm(string_value = "seoul")]
    Seoul,
    #[sea_orm(string_value = "gyeonggi")]
    Gyeonggi,
    #[sea_orm(string_value = "incheon")]
    Incheon,
    #[sea_orm(string_value = "busan")]
    Busan,
    #[sea_orm(string_value = "daegu")]
    Daegu,
    #[sea_orm(string_value = "gwangju")]
    Gwangju,
    #[sea_orm(string_value = "daejeon")]
    Daejeon,
    #[sea_orm(string_value = "gangwon")]
    Gangwon,
    #[sea_orm(string_value = "chungcheong")]
    Chungcheong,
    #[sea_orm(string_value = "jeolla")]
    Jeolla,
    #[sea_orm(string_value = "gyeongsang")]
    Gyeongsang,
    #[sea_orm(string_value = "jeju")]
    Jeju,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exhibition")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub start_date: Date,

    /// Always >= `start_date`.
    pub end_date: Date,

    pub genre: Genre,

    pub latitude: f64,

    pub longitude: f64,

    pub area: Area,

    /// Venue name
    pub place: String,

    pub address: String,

    /// Contact information
    pub inquiry: String,

    /// Admission fee description (free text, e.g. "Adults 12,000 KRW")
    pub fee: String,

    /// Official exhibition page
    pub url: String,

    /// Thumbnail image URL
    pub thumbnail: String,

    /// Soft-delete flag. Deleted exhibitions are excluded from every query.
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exhibition_like::Entity")]
    Likes,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::exhibition_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
