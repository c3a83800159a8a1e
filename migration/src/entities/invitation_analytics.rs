//! View/click events recorded against an invitation

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "invitation_analytics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub invite_id: String,
    pub timestamp: DateTimeUtc,
    /// "view" | "click"
    #[sea_orm(column_name = "type")]
    pub event_type: String,
    pub location: String,
    /// "mobile" | "tablet" | "desktop"
    pub device: String,
    #[sea_orm(column_type = "Text")]
    pub referral: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
