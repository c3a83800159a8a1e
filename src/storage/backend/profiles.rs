//! Profile operations for SeaOrmStorage

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_profile, profile_to_active_model};
use super::retry;
use crate::errors::{BiolinkError, Result};
use crate::storage::Profile;

use migration::entities::profile;

impl SeaOrmStorage {
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("get_profile({})", user_id),
            self.retry_config,
            || async { profile::Entity::find_by_id(user_id).one(db).await },
        )
        .await?;

        model.map(model_to_profile).transpose()
    }

    pub async fn get_profile_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("get_profile_by_username({})", username),
            self.retry_config,
            || async {
                profile::Entity::find()
                    .filter(profile::Column::Username.eq(username))
                    .one(db)
                    .await
            },
        )
        .await?;

        model.map(model_to_profile).transpose()
    }

    /// username 是否已被其他用户占用
    pub async fn username_taken(&self, username: &str, except_user: &str) -> Result<bool> {
        let existing = profile::Entity::find()
            .filter(profile::Column::Username.eq(username))
            .filter(profile::Column::Id.ne(except_user))
            .one(&self.db)
            .await?;
        Ok(existing.is_some())
    }

    /// 插入或更新资料（premium 保持不变）
    pub async fn upsert_profile(&self, p: &Profile) -> Result<Profile> {
        let active = profile_to_active_model(p)?;

        profile::Entity::insert(active)
            .on_conflict(
                OnConflict::column(profile::Column::Id)
                    .update_columns([
                        profile::Column::Name,
                        profile::Column::Username,
                        profile::Column::Email,
                        profile::Column::Phone,
                        profile::Column::CountryCode,
                        profile::Column::Bio,
                        profile::Column::Avatar,
                        profile::Column::Links,
                        profile::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| BiolinkError::database_operation(format!("保存资料失败: {}", e)))?;

        info!("Profile saved: {}", p.id);
        self.get_profile(&p.id)
            .await?
            .ok_or_else(|| BiolinkError::not_found(format!("Profile not found: {}", p.id)))
    }

    /// 不存在时插入一条空资料，已存在则不做任何修改
    pub async fn ensure_profile(
        &self,
        user_id: &str,
        email: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let active = profile_to_active_model(&Profile::empty(user_id, email, now))?;

        let inserted = profile::Entity::insert(active)
            .on_conflict(OnConflict::column(profile::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            debug!("Created profile row for {}", user_id);
        }
        Ok(())
    }

    /// 开通 / 取消 premium
    pub async fn set_premium(&self, user_id: &str, premium: bool) -> Result<()> {
        let result = profile::Entity::update_many()
            .col_expr(profile::Column::Premium, Expr::value(premium))
            .filter(profile::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BiolinkError::not_found(format!(
                "Profile not found: {}",
                user_id
            )));
        }
        info!("Premium for {} set to {}", user_id, premium);
        Ok(())
    }
}
