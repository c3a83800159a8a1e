//! 公开的邀请页访问与链接跳转
//!
//! 打开邀请页记一次 view，经 `/go/{link_id}` 跳转记一次 click。

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::analytics::{EventRecorder, EventType, RequestMeta};
use crate::errors::BiolinkError;
use crate::services::InvitationService;
use crate::storage::{CatalogueItem, InviteLink, Invitation, Theme};

use super::helpers::{error_from_biolink, success_response};

/// 访客看到的邀请页（不含所有者信息）
#[derive(Debug, Clone, Serialize)]
pub struct PublicInvitation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub links: Vec<InviteLink>,
    pub theme: Option<Theme>,
    pub catalogue: Vec<CatalogueItem>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Invitation> for PublicInvitation {
    fn from(inv: Invitation) -> Self {
        Self {
            id: inv.id,
            title: inv.title,
            description: inv.description,
            links: inv.links,
            theme: inv.theme,
            catalogue: inv.catalogue,
            expires_at: inv.expires_at,
        }
    }
}

pub struct InviteService;

impl InviteService {
    pub async fn view_invitation(
        req: HttpRequest,
        path: web::Path<String>,
        invitations: web::Data<InvitationService>,
        recorder: web::Data<EventRecorder>,
    ) -> impl Responder {
        let invite_id = path.into_inner();

        match invitations.get_public(&invite_id).await {
            Ok(invitation) => {
                recorder.record(&invite_id, EventType::View, RequestMeta::from_request(&req));
                success_response(PublicInvitation::from(invitation))
            }
            Err(e) => error_from_biolink(&e),
        }
    }

    pub async fn follow_link(
        req: HttpRequest,
        path: web::Path<(String, String)>,
        invitations: web::Data<InvitationService>,
        recorder: web::Data<EventRecorder>,
    ) -> impl Responder {
        let (invite_id, link_id) = path.into_inner();

        let invitation = match invitations.get_public(&invite_id).await {
            Ok(invitation) => invitation,
            Err(e) => return error_from_biolink(&e),
        };

        let Some(link) = invitation.find_link(&link_id) else {
            return error_from_biolink(&BiolinkError::not_found(format!(
                "Link not found: {}",
                link_id
            )));
        };

        trace!("Redirecting {}/{} -> {}", invite_id, link_id, link.url);
        recorder.record(&invite_id, EventType::Click, RequestMeta::from_request(&req));

        HttpResponse::TemporaryRedirect()
            .insert_header((LOCATION, link.url.as_str()))
            .finish()
    }
}

/// 公开路由 `/invite`
pub fn invite_routes() -> actix_web::Scope {
    web::scope("/invite")
        .route("/{id}", web::get().to(InviteService::view_invitation))
        .route(
            "/{id}/go/{link_id}",
            web::get().to(InviteService::follow_link),
        )
}
