use serde_json::json;
use warp::http::StatusCode;

use crate::handlers::response::ApiResponse;
use crate::storage::UserStorage;

/// `GET /health`
pub async fn health(storage: &dyn UserStorage) -> ApiResponse {
    match storage.health_check().await {
        Ok(true) => ApiResponse::ok(&json!({ "status": "ok", "storage": "ok" })),
        Ok(false) => ApiResponse::failure(StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable"),
        Err(e) => {
            log::error!("Storage health check failed: {}", e);
            ApiResponse::failure(StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
        }
    }
}
