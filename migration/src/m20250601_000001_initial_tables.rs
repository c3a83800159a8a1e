//! 初始表结构
//!
//! - profiles: 用户主页（bio 页面）
//! - invitations: 可分享的邀请页
//! - invitation_analytics: 邀请页的浏览/点击事件

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 profiles 表
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Name).string().not_null().default(""))
                    .col(ColumnDef::new(Profiles::Username).string_len(64).null())
                    .col(ColumnDef::new(Profiles::Email).string().null())
                    .col(ColumnDef::new(Profiles::Phone).string_len(32).null())
                    .col(ColumnDef::new(Profiles::CountryCode).string_len(8).null())
                    .col(ColumnDef::new(Profiles::Bio).text().not_null().default(""))
                    .col(ColumnDef::new(Profiles::Avatar).text().null())
                    .col(ColumnDef::new(Profiles::Links).text().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Profiles::Premium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // username 唯一（允许 NULL）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profiles_username")
                    .table(Profiles::Table)
                    .col(Profiles::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 invitations 表
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitations::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitations::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(Invitations::Title).string().not_null())
                    .col(
                        ColumnDef::new(Invitations::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Invitations::Links)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Invitations::Theme).text().null())
                    .col(
                        ColumnDef::new(Invitations::Catalogue)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Invitations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Invitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invitations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按用户列出邀请页（created_at 倒序）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invitations_user_created")
                    .table(Invitations::Table)
                    .col(Invitations::UserId)
                    .col(Invitations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 invitation_analytics 表
        manager
            .create_table(
                Table::create()
                    .table(InvitationAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvitationAnalytics::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvitationAnalytics::InviteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvitationAnalytics::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvitationAnalytics::Type)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvitationAnalytics::Location)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(InvitationAnalytics::Device)
                            .string_len(16)
                            .not_null()
                            .default("desktop"),
                    )
                    .col(
                        ColumnDef::new(InvitationAnalytics::Referral)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // 单邀请页时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invitation_analytics_invite_time")
                    .table(InvitationAnalytics::Table)
                    .col(InvitationAnalytics::InviteId)
                    .col(InvitationAnalytics::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_invitation_analytics_invite_time")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(InvitationAnalytics::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_invitations_user_created").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invitations::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_profiles_username").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Name,
    Username,
    Email,
    Phone,
    CountryCode,
    Bio,
    Avatar,
    Links,
    Premium,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invitations {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Links,
    Theme,
    Catalogue,
    IsActive,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum InvitationAnalytics {
    Table,
    Id,
    InviteId,
    Timestamp,
    Type,
    Location,
    Device,
    Referral,
}
