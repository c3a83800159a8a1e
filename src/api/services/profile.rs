use actix_web::web::ReqData;
use actix_web::{Responder, web};

use crate::services::{ProfileService, ProfileUpdate};
use crate::session::Session;

use super::helpers::{api_result, success_response};

/// GET /profile/{username}
pub async fn view_public_profile(
    profiles: web::Data<ProfileService>,
    path: web::Path<String>,
) -> impl Responder {
    api_result(profiles.get_public(&path.into_inner()).await)
}

/// 公开路由 `/profile`
pub fn public_profile_routes() -> actix_web::Scope {
    web::scope("/profile").route("/{username}", web::get().to(view_public_profile))
}

/// GET /api/v1/session
pub async fn get_session(session: ReqData<Session>) -> impl Responder {
    success_response(session.into_inner())
}

/// GET /api/v1/profile
pub async fn get_profile(
    session: ReqData<Session>,
    profiles: web::Data<ProfileService>,
) -> impl Responder {
    api_result(profiles.get(&session.user_id).await)
}

/// PUT /api/v1/profile
pub async fn save_profile(
    session: ReqData<Session>,
    profiles: web::Data<ProfileService>,
    body: web::Json<ProfileUpdate>,
) -> impl Responder {
    api_result(profiles.save(&session, body.into_inner()).await)
}
