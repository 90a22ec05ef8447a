//! Fundlink - a crowdfunding marketplace API server
//!
//! This library provides the core functionality for a crowdfunding
//! platform: user accounts with JWT authentication, role-gated project,
//! investment and document management, and a real-time change feed.

pub mod auth;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
