//! Warp route tree
//!
//! Protected routes run the authentication gate as a filter, so a request
//! without a valid bearer token is rejected before any handler code runs.
//! The resolved actor is handed to the handler as an ordinary argument.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use warp::hyper::body::Bytes;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::access::Actor;
use crate::error::GatehouseError;
use crate::handlers::response::ApiResponse;
use crate::handlers::{auth, health, users};
use crate::security::api_security_headers;
use crate::server::AppState;
use crate::services::{IdentityService, UserService};
use crate::storage::SharedUserStorage;

// Helper function to include shared state in a request
fn with<T: Clone + Send + Sync + 'static>(
    value: T,
) -> impl Filter<Extract = (T,), Error = Infallible> + Clone {
    warp::any().map(move || value.clone())
}

/// Request body as UTF-8 text, bounded by `limit` bytes
fn text_body(limit: u64) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    warp::body::content_length_limit(limit)
        .and(warp::body::bytes())
        .and_then(|bytes: Bytes| async move {
            String::from_utf8(bytes.to_vec()).map_err(|_| {
                warp::reject::custom(GatehouseError::MalformedInput(
                    "Request body must be valid UTF-8".to_string(),
                ))
            })
        })
}

/// Authentication gate: resolves the `Authorization` header into an actor or rejects with 401
pub fn authenticated(
    identity: Arc<IdentityService>,
) -> impl Filter<Extract = (Actor,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with(identity))
        .and_then(
            |authorization: Option<String>, identity: Arc<IdentityService>| async move {
                identity
                    .authenticate(authorization.as_deref())
                    .map_err(|e| {
                        log::debug!("Authentication gate rejected request: {}", e);
                        warp::reject::custom(e)
                    })
            },
        )
}

/// Turn rejections into envelope responses
pub async fn handle_rejection(err: Rejection) -> Result<ApiResponse, Infallible> {
    if let Some(e) = err.find::<GatehouseError>() {
        return Ok(ApiResponse::error(e));
    }

    if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        log::debug!("{}", e);
        return Ok(ApiResponse::failure(
            StatusCode::FORBIDDEN,
            "Origin not allowed",
        ));
    }

    // Body and query problems come from a route that matched, so they outrank method mismatches
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "Request body too large",
        ));
    }
    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "Request body is required",
        ));
    }
    if err.find::<warp::reject::InvalidQuery>().is_some() {
        return Ok(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "Invalid query string",
        ));
    }
    if err.find::<warp::reject::InvalidHeader>().is_some() {
        return Ok(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "Invalid request headers",
        ));
    }

    if err.is_not_found() || err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(ApiResponse::route_not_found());
    }

    log::error!("Unhandled rejection: {:?}", err);
    Ok(ApiResponse::failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
    ))
}

fn cors(allowed_origins: &[String]) -> warp::filters::cors::Cors {
    let builder = warp::cors()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"]);

    if allowed_origins.is_empty() {
        builder.allow_any_origin().build()
    } else {
        builder
            .allow_origins(allowed_origins.iter().map(String::as_str))
            .build()
    }
}

/// The user-facing API routes, without recovery or response decoration
pub fn routes(state: &AppState) -> impl Filter<Extract = (ApiResponse,), Error = Rejection> + Clone {
    let limit = state.max_body_bytes;
    let identity = state.identity.clone();
    let user_service = state.users.clone();

    let register = warp::path!("api" / "register")
        .and(warp::post())
        .and(text_body(limit))
        .and(with(identity.clone()))
        .then(|body: String, identity: Arc<IdentityService>| async move {
            auth::register(&identity, &body).await
        });

    let login = warp::path!("api" / "login")
        .and(warp::post())
        .and(text_body(limit))
        .and(with(identity.clone()))
        .then(|body: String, identity: Arc<IdentityService>| async move {
            auth::login(&identity, &body).await
        });

    let get_user = warp::path!("api" / "users" / String)
        .and(warp::get())
        .and(authenticated(identity.clone()))
        .and(with(user_service.clone()))
        .then(|id: String, actor: Actor, users: Arc<UserService>| async move {
            users::get_user_by_id(&users, &id, &actor).await
        });

    let list_users = warp::path!("api" / "users")
        .and(warp::get())
        .and(authenticated(identity.clone()))
        .and(warp::query::<HashMap<String, String>>())
        .and(with(user_service.clone()))
        .then(
            |actor: Actor, query: HashMap<String, String>, users: Arc<UserService>| async move {
                users::get_all_users(&users, &query, &actor).await
            },
        );

    let update_status = warp::path!("api" / "users" / String)
        .and(warp::put())
        .and(authenticated(identity))
        .and(text_body(limit))
        .and(with(user_service))
        .then(
            |id: String, actor: Actor, body: String, users: Arc<UserService>| async move {
                users::update_user_status(&users, &id, &body, &actor).await
            },
        );

    let health_check = warp::path!("health")
        .and(warp::get())
        .and(with(state.storage.clone()))
        .then(|storage: SharedUserStorage| async move { health::health(storage.as_ref()).await });

    register
        .or(login)
        .unify()
        .or(get_user)
        .unify()
        .or(list_users)
        .unify()
        .or(update_status)
        .unify()
        .or(health_check)
        .unify()
}

/// The complete service: routes, rejection recovery, security headers, CORS and access logging.
///
/// CORS denials are recovered a second time, outside the CORS filter, and the
/// security headers wrap both so every reply carries them.
pub fn api(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    routes(&state)
        .recover(handle_rejection)
        .unify()
        .with(cors(&state.allowed_origins))
        .recover(handle_rejection)
        .with(warp::reply::with::headers(api_security_headers()))
        .with(warp::log("gatehouse::access"))
}
