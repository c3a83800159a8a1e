use actix_web::web::ReqData;
use actix_web::{Responder, web};
use tracing::debug;

use crate::services::{InvitationService, NewInvitation};
use crate::session::Session;

use super::helpers::api_result;
use super::types::{DeletedResponse, InvitationStatusRequest};

/// GET /api/v1/invitations
pub async fn list_invitations(
    session: ReqData<Session>,
    invitations: web::Data<InvitationService>,
) -> impl Responder {
    api_result(invitations.list(&session).await)
}

/// POST /api/v1/invitations
pub async fn create_invitation(
    session: ReqData<Session>,
    invitations: web::Data<InvitationService>,
    body: web::Json<NewInvitation>,
) -> impl Responder {
    let req = body.into_inner();
    debug!("Creating invitation '{}' for {}", req.title, session.user_id);
    api_result(invitations.create(&session, req).await)
}

/// GET /api/v1/invitations/{id}
pub async fn get_invitation(
    session: ReqData<Session>,
    invitations: web::Data<InvitationService>,
    path: web::Path<String>,
) -> impl Responder {
    api_result(invitations.get_own_view(&session, &path.into_inner()).await)
}

/// PATCH /api/v1/invitations/{id}
pub async fn update_invitation_status(
    session: ReqData<Session>,
    invitations: web::Data<InvitationService>,
    path: web::Path<String>,
    body: web::Json<InvitationStatusRequest>,
) -> impl Responder {
    api_result(
        invitations
            .set_active(&session, &path.into_inner(), body.is_active)
            .await,
    )
}

/// DELETE /api/v1/invitations/{id}
pub async fn delete_invitation(
    session: ReqData<Session>,
    invitations: web::Data<InvitationService>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let result = invitations
        .delete(&session, &id)
        .await
        .map(|_| DeletedResponse { id, deleted: true });
    api_result(result)
}
