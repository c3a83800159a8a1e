//! API 类型定义

use serde::{Deserialize, Serialize};

/// 统一响应包装 `{ code, message, data }`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// `GET /health` 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// `DELETE` 成功时的响应数据
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeletedResponse {
    pub id: String,
    pub deleted: bool,
}

/// `PATCH /api/v1/invitations/{id}` 请求体
#[derive(Deserialize, Clone, Debug)]
pub struct InvitationStatusRequest {
    pub is_active: bool,
}
