//! HTTP 接口
//!
//! - `jwt`: 身份服务签发的 session token 校验
//! - `middleware`: 认证中间件，为每个请求构建 `Session`
//! - `services`: 路由与 handler

pub mod jwt;
pub mod middleware;
pub mod services;
