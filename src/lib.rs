//! Gatehouse - a minimal authentication and user-management HTTP service
//!
//! This library provides registration and login with hashed passwords and
//! signed bearer tokens, plus role-gated user lookup, listing and
//! active/blocked status changes.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod server;
pub mod services;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
