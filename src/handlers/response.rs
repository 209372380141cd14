//! JSON response envelope
//!
//! Success: `{"success": true, "data": ...}`.
//! Failure: `{"success": false, "error": "..."}`, plus `details` for
//! field-level validation failures.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::reply::Response;

use crate::error::{GatehouseError, Result};

/// A status code and envelope body, ready to be sent
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    pub fn success<T: Serialize>(status: StatusCode, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status,
                body: json!({ "success": true, "data": data }),
            },
            Err(e) => Self::error(&GatehouseError::Internal(format!(
                "Failed to serialize response: {}",
                e
            ))),
        }
    }

    pub fn ok<T: Serialize>(data: &T) -> Self {
        Self::success(StatusCode::OK, data)
    }

    pub fn created<T: Serialize>(data: &T) -> Self {
        Self::success(StatusCode::CREATED, data)
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "success": false, "error": message.into() }),
        }
    }

    pub fn error(err: &GatehouseError) -> Self {
        if err.is_internal() {
            log::error!("Request failed: {}", err);
        }

        let mut response = Self::failure(err.status_code(), err.public_message());
        if let Some(details) = err.field_errors() {
            response.body["details"] = json!(details);
        }
        response
    }

    /// Envelope `result` with `status` on success, or its error otherwise
    pub fn from_result<T: Serialize>(status: StatusCode, result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(status, &data),
            Err(e) => Self::error(&e),
        }
    }

    pub fn route_not_found() -> Self {
        Self::failure(StatusCode::NOT_FOUND, "Route not found")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl warp::Reply for ApiResponse {
    fn into_response(self) -> Response {
        warp::reply::with_status(warp::reply::json(&self.body), self.status).into_response()
    }
}

/// Decode a JSON object body into `T`
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| GatehouseError::MalformedInput("Invalid JSON".to_string()))?;

    if !value.is_object() {
        return Err(GatehouseError::MalformedInput(
            "Request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| GatehouseError::MalformedInput(format!("Invalid request body: {}", e)))
}
