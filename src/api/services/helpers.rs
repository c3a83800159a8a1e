//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::BiolinkError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 BiolinkError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_biolink(err: &BiolinkError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 BiolinkError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<BiolinkError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: BiolinkError = e.into();
            error_from_biolink(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_api_result_maps_errors() {
        let resp = api_result::<(), _>(Err(BiolinkError::premium_required("CSV export")));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let parsed: ApiResponse<()> = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, ErrorCode::PremiumRequired as i32);
        assert!(parsed.data.is_none());
    }

    #[actix_rt::test]
    async fn test_success_envelope() {
        let resp = success_response(vec![1, 2, 3]);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let parsed: ApiResponse<Vec<i32>> = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, 0);
        assert_eq!(parsed.message, "OK");
        assert_eq!(parsed.data, Some(vec![1, 2, 3]));
    }
}
