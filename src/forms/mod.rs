//! Form and query-string payloads accepted by the routes.

pub mod auth;
pub mod listing;
