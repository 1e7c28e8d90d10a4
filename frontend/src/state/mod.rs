pub mod auth;
pub mod cache;
pub mod notification;
pub mod session;
pub mod stories;
pub mod story_query;
pub mod validation;
