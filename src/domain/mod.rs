//! Domain types shared by the dashboard services and views.

pub mod member;
pub mod post;
pub mod types;
pub mod user;
