pub mod admin;
pub mod auth;
pub mod documents;
pub mod investments;
pub mod projects;
pub mod users;
pub mod ws;
