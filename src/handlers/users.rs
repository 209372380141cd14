//! User lookup, listing and status handlers. All of them require an actor,
//! which the authentication gate resolves before they run.

use serde_json::{json, Value};
use std::collections::HashMap;
use warp::http::StatusCode;

use crate::auth::access::Actor;
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{FieldError, GatehouseError, Result};
use crate::handlers::response::{parse_body, ApiResponse};
use crate::services::UserService;

/// Path ids must be positive integers
pub fn parse_user_id(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(GatehouseError::Validation(vec![FieldError::new(
            "id",
            "ID must be a positive number",
        )])),
    }
}

fn query_usize(
    query: &HashMap<String, String>,
    key: &str,
    default: usize,
    errors: &mut Vec<FieldError>,
) -> usize {
    match query.get(key).map(|v| v.trim()) {
        None | Some("") => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            errors.push(FieldError::new(key, "Must be a non-negative integer"));
            default
        }),
    }
}

/// Parse `skip`/`take` from the query string. `take` is clamped by the service.
pub fn parse_pagination(query: &HashMap<String, String>) -> Result<(usize, usize)> {
    let mut errors = Vec::new();
    let skip = query_usize(query, "skip", 0, &mut errors);
    let take = query_usize(query, "take", DEFAULT_PAGE_SIZE, &mut errors);
    if errors.is_empty() {
        Ok((skip, take))
    } else {
        Err(GatehouseError::Validation(errors))
    }
}

fn parse_status_body(body: &str) -> Result<bool> {
    let value: Value = parse_body(body)?;
    value
        .get("isActive")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            GatehouseError::Validation(vec![FieldError::new(
                "isActive",
                "isActive must be a boolean",
            )])
        })
}

/// `GET /api/users/{id}`
pub async fn get_user_by_id(users: &UserService, raw_id: &str, actor: &Actor) -> ApiResponse {
    let result = match parse_user_id(raw_id) {
        Ok(id) => users.get_user_by_id(id, actor).await,
        Err(e) => Err(e),
    };
    ApiResponse::from_result(StatusCode::OK, result)
}

/// `GET /api/users?skip=&take=`
pub async fn get_all_users(
    users: &UserService,
    query: &HashMap<String, String>,
    actor: &Actor,
) -> ApiResponse {
    let result = match parse_pagination(query) {
        Ok((skip, take)) => users.get_all_users(actor, skip, take).await,
        Err(e) => Err(e),
    };
    ApiResponse::from_result(StatusCode::OK, result)
}

/// `PUT /api/users/{id}` with `{"isActive": bool}`
pub async fn update_user_status(
    users: &UserService,
    raw_id: &str,
    body: &str,
    actor: &Actor,
) -> ApiResponse {
    let request = parse_user_id(raw_id).and_then(|id| Ok((id, parse_status_body(body)?)));
    let result = match request {
        Ok((id, is_active)) => users
            .update_user_status(id, is_active, actor)
            .await
            .map(|user| {
                let message = if is_active { "User unblocked" } else { "User blocked" };
                json!({ "message": message, "user": user })
            }),
        Err(e) => Err(e),
    };
    ApiResponse::from_result(StatusCode::OK, result)
}
