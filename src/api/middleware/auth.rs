use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::api::jwt::JwtVerifier;
use crate::api::services::ErrorCode;
use crate::api::services::helpers::json_response;
use crate::services::ProfileService;
use crate::session::Session;

/// Session authentication middleware
///
/// 校验 `Authorization: Bearer <token>`，为请求构建 `Session` 并放入扩展，
/// handler 通过 `ReqData<Session>` 取用。
#[derive(Clone)]
pub struct SessionAuth {
    verifier: Arc<JwtVerifier>,
    profiles: ProfileService,
}

impl SessionAuth {
    pub fn new(verifier: Arc<JwtVerifier>, profiles: ProfileService) -> Self {
        Self { verifier, profiles }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
            profiles: self.profiles.clone(),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<JwtVerifier>,
    profiles: ProfileService,
}

impl<S, B> SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        debug!("Authentication failed for {}: {}", req.path(), message);
        req.into_response(
            json_response::<()>(
                actix_web::http::StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                message,
                None,
            )
            .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let verifier = self.verifier.clone();
        let profiles = self.profiles.clone();

        Box::pin(async move {
            // CORS 预检不带 token
            if req.method() == Method::OPTIONS {
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::handle_unauthorized(
                    req,
                    "Unauthorized: missing bearer token",
                ));
            };

            let claims = match verifier.verify(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    return Ok(Self::handle_unauthorized(
                        req,
                        &format!("Unauthorized: {}", e.message()),
                    ));
                }
            };

            // 首次请求时建立空资料，失败不阻断请求
            if let Err(e) = profiles.ensure(&claims.sub, claims.email.clone()).await {
                warn!("Failed to ensure profile for {}: {}", claims.sub, e);
            }
            let premium = profiles.is_premium(&claims.sub).await;

            let session = Session::from_claims(claims, premium);
            trace!(
                "Authenticated {} (premium: {})",
                session.user_id, session.premium
            );
            req.extensions_mut().insert(session);

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
