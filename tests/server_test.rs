use serde_json::{json, Value};
use std::sync::Arc;

use gatehouse::auth::{PasswordHasher, TokenManager};
use gatehouse::handlers::routes;
use gatehouse::server::AppState;
use gatehouse::services::{IdentityService, UserService};
use gatehouse::storage::{MemoryUserStorage, SharedUserStorage};

fn spawn_server() -> std::net::SocketAddr {
    let storage: SharedUserStorage = Arc::new(MemoryUserStorage::new());
    let identity = IdentityService::new(
        storage.clone(),
        PasswordHasher::with_cost(1024, 1).unwrap(),
        Arc::new(TokenManager::new("server-test-signing-key-1q2w3e4r5t6y7u8i")),
    );
    let state = AppState::new(identity, UserService::new(storage.clone()), storage);

    let (addr, server) = warp::serve(routes::api(state)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn test_http_round_trip() {
    let addr = spawn_server();
    let base = format!("http://{}", addr);
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/register", base))
        .json(&json!({
            "firstName": "Linus",
            "lastName": "Torvalds",
            "birthDate": "1969-12-28",
            "email": "linus@example.com",
            "password": "penguin1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: Value = response.json().await.unwrap();
    let id = body["data"]["user"]["id"].as_u64().unwrap();

    let response = client
        .post(format!("{}/api/login", base))
        .json(&json!({ "email": "linus@example.com", "password": "penguin1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/api/users/{}", base, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["firstName"], "Linus");

    let response = client
        .get(format!("{}/api/users/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_cors_preflight() {
    let addr = spawn_server();
    let client = reqwest::Client::new();

    let response = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/api/login", addr),
        )
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
