//! 路由配置

use actix_web::web;

use super::analytics::{export_invitation_analytics, get_dashboard, get_invitation_analytics};
use super::health::health_routes;
use super::invitations::{
    create_invitation, delete_invitation, get_invitation, list_invitations,
    update_invitation_status,
};
use super::invite::invite_routes;
use super::profile::{get_profile, get_session, public_profile_routes, save_profile};
use crate::api::middleware::SessionAuth;

/// 邀请页管理路由 `/invitations`
///
/// 包含：
/// - GET/POST /invitations - 列表 / 创建
/// - GET /invitations/{id}/analytics - 原始事件 + 7 天序列（premium）
/// - GET /invitations/{id}/analytics/export - CSV 下载（premium）
/// - GET/PATCH/DELETE /invitations/{id} - 读取 / 启停 / 删除
pub fn invitations_routes() -> actix_web::Scope {
    web::scope("/invitations")
        .route("", web::get().to(list_invitations))
        .route("", web::post().to(create_invitation))
        .route(
            "/{id}/analytics/export",
            web::get().to(export_invitation_analytics),
        )
        .route("/{id}/analytics", web::get().to(get_invitation_analytics))
        .route("/{id}", web::get().to(get_invitation))
        .route("/{id}", web::patch().to(update_invitation_status))
        .route("/{id}", web::delete().to(delete_invitation))
}

/// 需要登录的路由 `/api/v1`
pub fn api_v1_routes() -> actix_web::Scope {
    web::scope("/api/v1")
        .route("/session", web::get().to(get_session))
        .route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(save_profile))
        .route("/analytics", web::get().to(get_dashboard))
        .service(invitations_routes())
}

/// 注册全部路由，`/api/v1` 由 `auth` 保护
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: SessionAuth) {
    cfg.service(health_routes())
        .service(invite_routes())
        .service(public_profile_routes())
        .service(api_v1_routes().wrap(auth));
}
