//! Registration and login handlers

use serde_json::json;
use warp::http::StatusCode;

use crate::handlers::response::{parse_body, ApiResponse};
use crate::services::validation::{LoginRequest, RegisterRequest};
use crate::services::IdentityService;

/// `POST /api/register` - 201 with the new user's safe view
pub async fn register(identity: &IdentityService, body: &str) -> ApiResponse {
    let result = match parse_body::<RegisterRequest>(body) {
        Ok(request) => identity.register(request).await,
        Err(e) => Err(e),
    };
    ApiResponse::from_result(StatusCode::CREATED, result.map(|user| json!({ "user": user })))
}

/// `POST /api/login` - 200 with a bearer token and the user's safe view
pub async fn login(identity: &IdentityService, body: &str) -> ApiResponse {
    let result = match parse_body::<LoginRequest>(body) {
        Ok(request) => identity.login(request).await,
        Err(e) => Err(e),
    };
    ApiResponse::from_result(StatusCode::OK, result)
}
