use actix_web::dev::ServerHandle;
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待 Ctrl+C，然后优雅停止 HTTP server 并关闭连接池
pub async fn listen_for_shutdown(server: ServerHandle, db: DatabaseConnection) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    // 正在写入的统计任务有机会在此期间完成
    if timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        server.stop(true),
    )
    .await
    .is_err()
    {
        error!(
            "Server did not stop within {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        );
    }

    match db.close().await {
        Ok(()) => info!("Database connections closed"),
        Err(e) => warn!("Failed to close database connections: {}", e),
    }
}
