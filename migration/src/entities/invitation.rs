//! Invitation entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// JSON array of outbound links
    #[sea_orm(column_type = "Text")]
    pub links: String,
    /// JSON theme object (premium only)
    #[sea_orm(column_type = "Text", nullable)]
    pub theme: Option<String>,
    /// JSON array of catalogue items (premium only)
    #[sea_orm(column_type = "Text")]
    pub catalogue: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub expires_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
