use actix_web::{Responder, web};
use chrono::Utc;
use tracing::trace;

use super::helpers::success_response;
use super::types::HealthResponse;

pub struct HealthService;

impl HealthService {
    /// 存活探针，不访问数据库
    pub async fn health_check() -> impl Responder {
        trace!("Received health check request");
        success_response(HealthResponse {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        })
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
