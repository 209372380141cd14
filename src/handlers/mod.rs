//! Request handlers for the HTTP endpoints

pub mod auth;
pub mod health;
pub mod response;
pub mod routes;
pub mod users;

pub use response::ApiResponse;
pub use routes::api;
