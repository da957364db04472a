//! Domain services orchestrating the database layer and auth primitives.

pub mod auth;
pub mod comments;
pub mod google;
pub mod posts;
pub mod users;

pub use google::GoogleTokenVerifier;
