//! Invitation operations for SeaOrmStorage

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{invitation_to_active_model, model_to_invitation};
use super::retry;
use crate::errors::{BiolinkError, Result};
use crate::storage::Invitation;

use migration::entities::{invitation, invitation_analytics};

impl SeaOrmStorage {
    /// 某用户的全部邀请页，最新的在前
    pub async fn list_invitations(&self, user_id: &str) -> Result<Vec<Invitation>> {
        let db = &self.db;
        let models = retry::with_retry(
            &format!("list_invitations({})", user_id),
            self.retry_config,
            || async {
                invitation::Entity::find()
                    .filter(invitation::Column::UserId.eq(user_id))
                    .order_by_desc(invitation::Column::CreatedAt)
                    .all(db)
                    .await
            },
        )
        .await?;

        models.into_iter().map(model_to_invitation).collect()
    }

    pub async fn get_invitation(&self, id: &str) -> Result<Option<Invitation>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("get_invitation({})", id),
            self.retry_config,
            || async { invitation::Entity::find_by_id(id).one(db).await },
        )
        .await?;

        model.map(model_to_invitation).transpose()
    }

    pub async fn insert_invitation(&self, inv: &Invitation) -> Result<()> {
        let active = invitation_to_active_model(inv)?;
        invitation::Entity::insert(active)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| BiolinkError::database_operation(format!("创建邀请页失败: {}", e)))?;

        info!("Invitation created: {} (owner {})", inv.id, inv.user_id);
        Ok(())
    }

    /// 启用 / 停用本人的邀请页
    ///
    /// MySQL 的 rows_affected 不计值未变化的行，调用方需先确认归属。
    pub async fn set_invitation_active(
        &self,
        user_id: &str,
        id: &str,
        active: bool,
    ) -> Result<()> {
        invitation::Entity::update_many()
            .col_expr(invitation::Column::IsActive, Expr::value(active))
            .filter(invitation::Column::Id.eq(id))
            .filter(invitation::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        info!("Invitation {} active set to {}", id, active);
        Ok(())
    }

    /// 删除本人的邀请页及其统计事件，返回是否删除了记录
    pub async fn delete_invitation(&self, user_id: &str, id: &str) -> Result<bool> {
        let txn = self.db.begin().await?;

        let result = invitation::Entity::delete_many()
            .filter(invitation::Column::Id.eq(id))
            .filter(invitation::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        let events = invitation_analytics::Entity::delete_many()
            .filter(invitation_analytics::Column::InviteId.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(
            "Invitation deleted: {} ({} analytics events removed)",
            id, events.rows_affected
        );
        Ok(true)
    }
}
